//! Multi-user address book service
//!
//! Users register or log in to obtain a bearer token, then manage a private
//! list of contacts. Every contact query and mutation is scoped to the
//! identity carried by the token.

pub mod auth;
pub mod config;
pub mod contacts;
pub mod database;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
