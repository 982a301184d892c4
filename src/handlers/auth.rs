use axum::{extract::State, http::StatusCode, response::Json};
use model::{entities::user, password::PasswordHash};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, AppState, ErrorResponse, MessageResponse};

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Username (must be unique)
    pub username: Option<String>,
    /// Plaintext password; stored only as a bcrypt hash
    pub password: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Username
    pub username: Option<String>,
    /// Plaintext password
    pub password: Option<String>,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Missing fields or username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering register function");

    let (username, password) = match (request.username, request.password) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            warn!("Registration request is missing username or password");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Username and password are required".to_string(),
                }),
            ));
        }
    };

    debug!("Registering user with username: {}", username);

    let password_hash = match PasswordHash::new(&password) {
        Ok(password_hash) => password_hash,
        Err(e) => {
            error!("Failed to hash password for '{}': {}", username, e);
            return Err(internal_error());
        }
    };

    let new_user = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash.into_string()),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User registered successfully with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "User registered successfully".to_string(),
                }),
            ))
        }
        Err(db_error) => {
            // The unique index on `username` turns a duplicate registration
            // into a constraint violation instead of a racy pre-check query.
            let error_msg = db_error.to_string().to_lowercase();
            if error_msg.contains("unique") || error_msg.contains("constraint") {
                warn!("Registration rejected, username '{}' already exists", username);
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Username already exists".to_string(),
                    }),
                ))
            } else {
                error!("Failed to register user '{}': {}", username, db_error);
                Err(internal_error())
            }
        }
    }
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = MessageResponse),
        (status = 400, description = "Missing username or password", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering login function");

    let (username, password) = match (request.username, request.password) {
        (Some(username), Some(password)) => (username, password),
        _ => {
            warn!("Login request is missing username or password");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Username and password are required".to_string(),
                }),
            ));
        }
    };

    debug!("Login attempt for username: {}", username);

    trace!("Looking up user by username");
    let user_model = match user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await
    {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            warn!("Login failed, no such user: {}", username);
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid username or password".to_string(),
                }),
            ));
        }
        Err(db_error) => {
            error!("Failed to look up user '{}': {}", username, db_error);
            return Err(internal_error());
        }
    };

    trace!("Verifying password against stored hash");
    match PasswordHash::from_hash(user_model.password_hash).verify(&password) {
        Ok(true) => {
            info!("User '{}' logged in successfully", username);
            Ok(Json(MessageResponse {
                message: "Login successful".to_string(),
            }))
        }
        Ok(false) => {
            warn!("Login failed, wrong password for user '{}'", username);
            Err((
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "Invalid username or password".to_string(),
                }),
            ))
        }
        Err(e) => {
            error!("Failed to verify password for '{}': {}", username, e);
            Err(internal_error())
        }
    }
}
