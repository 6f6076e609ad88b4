//! Address book models

pub mod contact;
pub mod user;

// Re-export for convenience
pub use contact::{Contact, ContactFields, ContactResponse};
pub use user::{LoginRequest, NewUser, RegisterRequest, TokenResponse, User};
