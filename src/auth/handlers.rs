use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::auth::dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest};
use crate::auth::error::AuthError;
use crate::auth::extractors::AuthUser;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::auth::service;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = PublicUser),
        (status = 400, description = "Malformed input", body = crate::auth::error::ErrorBody),
        (status = 409, description = "Username or email already taken", body = crate::auth::error::ErrorBody),
    )
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), AuthError> {
    let user = service::register(&state.db, state.config.bcrypt_cost, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = crate::auth::error::ErrorBody),
    )
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let response = service::login(&state.db, &keys, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current user", body = PublicUser),
        (status = 401, description = "Missing or invalid token", body = crate::auth::error::ErrorBody),
    )
)]
#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, AuthError> {
    let user = User::find_by_id(&state.db, user_id).await?.ok_or_else(|| {
        error!(user_id, "token subject not found");
        AuthError::Unauthorized
    })?;

    Ok(Json(PublicUser::from(user)))
}
