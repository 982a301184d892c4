use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    auth::{login, register},
    expenses::{create_expense, delete_expense, get_expense, update_expense},
    health::health_check,
    users::{delete_user, get_user, update_user},
};
use crate::schemas::{ApiDoc, AppState};

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Registration and login
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        // User CRUD routes
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id", put(update_user))
        .route("/api/users/:user_id", delete(delete_user))
        // Expense CRUD routes
        .route("/api/expenses", post(create_expense))
        .route("/api/expenses/:expense_id", get(get_expense))
        .route("/api/expenses/:expense_id", put(update_expense))
        .route("/api/expenses/:expense_id", delete(delete_expense))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
