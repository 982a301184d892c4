use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::{entities::user, password::PasswordHash};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, AppState, ErrorResponse, MessageResponse};

/// Request body for updating a user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Username (must be unique)
    pub username: Option<String>,
    /// New plaintext password; re-hashed before storage
    pub password: Option<String>,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_user function for user_id: {}", user_id);
    debug!("Fetching user with ID: {}", user_id);

    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => {
            info!(
                "Successfully retrieved user with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            Ok(Json(UserResponse::from(user_model)))
        }
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(internal_error())
        }
    }
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = MessageResponse),
        (status = 400, description = "Username already exists", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_user function for user_id: {}", user_id);
    debug!("Updating user with ID: {}", user_id);

    // Lookup and update share one transaction so a concurrent request cannot
    // interleave between them.
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to begin transaction: {}", db_error);
            return Err(internal_error());
        }
    };

    trace!("Looking up existing user with ID: {}", user_id);
    let existing_user = match user::Entity::find_by_id(user_id).one(&txn).await {
        Ok(Some(user_model)) => {
            debug!("Found existing user: {}", user_model.username);
            user_model
        }
        Ok(None) => {
            warn!("User with ID {} not found for update", user_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "User not found".to_string(),
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to lookup user with ID {} for update: {}",
                user_id, db_error
            );
            return Err(internal_error());
        }
    };

    // Update only fields present in the payload.
    let mut user_active: user::ActiveModel = existing_user.into();
    let mut updated_fields = Vec::new();

    if let Some(username) = request.username {
        debug!("Updating username to: {}", username);
        user_active.username = Set(username.clone());
        updated_fields.push(format!("username: {}", username));
    }
    if let Some(password) = request.password {
        debug!("Updating password for user ID: {}", user_id);
        let password_hash = match PasswordHash::new(&password) {
            Ok(password_hash) => password_hash,
            Err(e) => {
                error!("Failed to hash password for user ID {}: {}", user_id, e);
                return Err(internal_error());
            }
        };
        user_active.password_hash = Set(password_hash.into_string());
        updated_fields.push("password".to_string());
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
        return Ok(Json(MessageResponse {
            message: "User updated successfully".to_string(),
        }));
    }

    trace!("Attempting to update user in database");
    if let Err(db_error) = user_active.update(&txn).await {
        let error_msg = db_error.to_string().to_lowercase();
        if error_msg.contains("unique") || error_msg.contains("constraint") {
            warn!("Update rejected for user ID {}, username already exists", user_id);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Username already exists".to_string(),
                }),
            ));
        }
        error!("Failed to update user with ID {}: {}", user_id, db_error);
        return Err(internal_error());
    }

    if let Err(db_error) = txn.commit().await {
        error!("Failed to commit update for user ID {}: {}", user_id, db_error);
        return Err(internal_error());
    }

    info!(
        "User with ID {} updated successfully. Updated fields: {}",
        user_id,
        updated_fields.join(", ")
    );
    Ok(Json(MessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

/// Delete a user
///
/// The user's expenses are left untouched and keep their original user_id.
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    debug!("Attempting to delete user with ID: {}", user_id);

    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                Ok(Json(MessageResponse {
                    message: "User deleted successfully".to_string(),
                }))
            } else {
                warn!("User with ID {} not found for deletion", user_id);
                Err((
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "User not found".to_string(),
                    }),
                ))
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err(internal_error())
        }
    }
}
