use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest};
use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn register(
    db: &PgPool,
    bcrypt_cost: u32,
    payload: RegisterRequest,
) -> Result<PublicUser, AuthError> {
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(AuthError::Validation("username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AuthError::Validation("password must not be empty".into()));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::Validation("invalid email".into()));
    }

    // Pre-checks for precise errors; the insert constraint still guards the race
    if User::find_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AuthError::DuplicateEmail);
    }
    if User::find_by_username(db, &username).await?.is_some() {
        warn!(username = %username, "username already taken");
        return Err(AuthError::DuplicateUsername);
    }

    let hash = hash_password(&payload.password, bcrypt_cost)?;
    let user = User::create(db, &username, &email, &hash).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(PublicUser::from(user))
}

pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    payload: LoginRequest,
) -> Result<LoginResponse, AuthError> {
    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password are indistinguishable to the caller
    let user = match User::find_by_email(db, &email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(user.id, &user.username)?;
    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(LoginResponse {
        token,
        user: user.username,
    })
}
