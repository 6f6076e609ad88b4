//! Address book service routes

use axum::{
    Extension, Form, Json, Router,
    async_trait,
    body::Body,
    extract::{FromRequest, MatchedPath, Path, Request, State},
    http::header,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{Span, info_span};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{AuthUser, auth_middleware},
    models::{ContactFields, LoginRequest, RegisterRequest},
    state::AppState,
};

/// Create the router for the address book service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/:contact_id",
            put(update_contact).delete(delete_contact),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/token", post(login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .with_state(state)
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.contact_service.store_healthy().await;

    Json(json!({
        "status": if database { "ok" } else { "degraded" },
        "service": "addressbook",
        "database": database,
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.auth_service.register(payload).await?;
    Ok(Json(token))
}

/// Login credentials, accepted as an OAuth2 password form or as JSON
#[derive(Debug)]
pub struct LoginForm(pub LoginRequest);

#[async_trait]
impl<S> FromRequest<S> for LoginForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_content_type);

        let request = if is_json {
            let Json(request) = Json::<LoginRequest>::from_request(req, state).await?;
            request
        } else {
            let Form(request) = Form::<LoginRequest>::from_request(req, state).await?;
            request
        };

        Ok(LoginForm(request))
    }
}

/// Whether a `Content-Type` value names JSON, ignoring case and parameters
fn is_json_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .map(str::trim)
        .is_some_and(|essence| essence.eq_ignore_ascii_case("application/json"))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    LoginForm(payload): LoginForm,
) -> Result<impl IntoResponse, ApiError> {
    let token = state.auth_service.login(payload).await?;
    Ok(Json(token))
}

/// List the caller's contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let contacts = state.contact_service.list(user.id).await?;
    Ok(Json(contacts))
}

/// Create a contact owned by the caller
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<ContactFields>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state.contact_service.add(user.id, payload).await?;
    Ok(Json(contact))
}

/// Replace one of the caller's contacts
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(contact_id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<ContactFields>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state
        .contact_service
        .update(user.id, contact_id, payload)
        .await?;
    Ok(Json(contact))
}

/// Delete one of the caller's contacts
pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(contact_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    state.contact_service.delete(user.id, contact_id).await?;
    Ok(Json(json!({"message": "Contact deleted"})))
}
