use axum::{http::StatusCode, response::Json};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection pool; every request checks out its own connection.
    pub db: DatabaseConnection,
}

/// Confirmation message returned by mutating endpoints
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// The 500 response returned when a database or hashing call fails.
pub fn internal_error() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::expenses::create_expense,
        crate::handlers::expenses::get_expense,
        crate::handlers::expenses::update_expense,
        crate::handlers::expenses::delete_expense,
    ),
    components(
        schemas(
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::expenses::CreateExpenseRequest,
            crate::handlers::expenses::CreateExpenseResponse,
            crate::handlers::expenses::UpdateExpenseRequest,
            crate::handlers::expenses::ExpenseResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "User registration and login"),
        (name = "users", description = "User management endpoints"),
        (name = "expenses", description = "Expense management endpoints"),
    ),
    info(
        title = "Budget Manager API",
        description = "Personal budget tracking API - user accounts and expense records",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
