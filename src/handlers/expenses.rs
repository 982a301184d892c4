use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Local, NaiveDate};
use model::entities::expense::{self, Category};
use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::schemas::{internal_error, AppState, ErrorResponse, MessageResponse};

/// Request body for creating a new expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateExpenseRequest {
    /// Expense title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Amount spent
    pub amount: f64,
    /// Category name: Food, Education or Entertainment
    pub category: String,
    /// Owning user ID; not checked against the users table
    pub user_id: Option<i32>,
    /// Expense date; defaults to today when omitted
    pub date: Option<NaiveDate>,
}

/// Request body for updating an expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateExpenseRequest {
    /// Expense title
    pub title: Option<String>,
    /// Omit to keep the stored description, pass null to clear it
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Amount spent
    pub amount: Option<f64>,
    /// Category name: Food, Education or Entertainment
    pub category: Option<String>,
    /// Owning user ID
    pub user_id: Option<i32>,
    /// Expense date
    pub date: Option<NaiveDate>,
}

/// Distinguishes a field set to `null` from a field that is absent: absent
/// stays `None`, an explicit `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Response for a newly created expense
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateExpenseResponse {
    /// Human-readable confirmation
    pub message: String,
    /// ID of the newly created expense
    pub id: i32,
}

/// Expense response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpenseResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    /// ISO-8601 date (YYYY-MM-DD)
    pub date: NaiveDate,
    #[schema(value_type = String)]
    pub category: Category,
    pub user_id: Option<i32>,
}

impl From<expense::Model> for ExpenseResponse {
    fn from(model: expense::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            amount: model.amount,
            date: model.date,
            category: model.category,
            user_id: model.user_id,
        }
    }
}

/// Create a new expense
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense created successfully", body = CreateExpenseResponse),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<CreateExpenseResponse>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_expense function");
    debug!(
        "Creating expense with title: {}, amount: {}, category: {}",
        request.title, request.amount, request.category
    );

    let category = match request.category.parse::<Category>() {
        Ok(category) => category,
        Err(e) => {
            warn!("Rejecting expense with invalid category '{}'", request.category);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    let date = request.date.unwrap_or_else(|| Local::now().date_naive());

    let new_expense = expense::ActiveModel {
        title: Set(request.title.clone()),
        description: Set(request.description.clone()),
        amount: Set(request.amount),
        date: Set(date),
        category: Set(category),
        user_id: Set(request.user_id),
        ..Default::default()
    };

    trace!("Attempting to insert new expense into database");
    match new_expense.insert(&state.db).await {
        Ok(expense_model) => {
            info!(
                "Expense created successfully with ID: {}, title: {}, amount: {}",
                expense_model.id, expense_model.title, expense_model.amount
            );
            Ok((
                StatusCode::CREATED,
                Json(CreateExpenseResponse {
                    message: "Expense created successfully".to_string(),
                    id: expense_model.id,
                }),
            ))
        }
        Err(db_error) => {
            error!("Failed to create expense '{}': {}", request.title, db_error);
            Err(internal_error())
        }
    }
}

/// Get a specific expense by ID
#[utoipa::path(
    get,
    path = "/api/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense retrieved successfully", body = ExpenseResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ExpenseResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_expense function for expense_id: {}", expense_id);
    debug!("Fetching expense with ID: {}", expense_id);

    match expense::Entity::find_by_id(expense_id).one(&state.db).await {
        Ok(Some(expense_model)) => {
            info!(
                "Successfully retrieved expense with ID: {}, title: {}",
                expense_model.id, expense_model.title
            );
            Ok(Json(ExpenseResponse::from(expense_model)))
        }
        Ok(None) => {
            warn!("Expense with ID {} not found", expense_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Expense not found".to_string(),
                }),
            ))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve expense with ID {}: {}",
                expense_id, db_error
            );
            Err(internal_error())
        }
    }
}

/// Update an expense
#[utoipa::path(
    put,
    path = "/api/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated successfully", body = MessageResponse),
        (status = 400, description = "Invalid category", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateExpenseRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_expense function for expense_id: {}", expense_id);
    debug!("Updating expense with ID: {}", expense_id);

    // Validate the category before touching the database.
    let category = match request.category {
        Some(ref raw) => match raw.parse::<Category>() {
            Ok(category) => Some(category),
            Err(e) => {
                warn!("Rejecting update with invalid category '{}'", raw);
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                ));
            }
        },
        None => None,
    };

    // Lookup and update share one transaction so a concurrent request cannot
    // interleave between them.
    let txn = match state.db.begin().await {
        Ok(txn) => txn,
        Err(db_error) => {
            error!("Failed to begin transaction: {}", db_error);
            return Err(internal_error());
        }
    };

    trace!("Looking up existing expense with ID: {}", expense_id);
    let existing_expense = match expense::Entity::find_by_id(expense_id).one(&txn).await {
        Ok(Some(expense_model)) => {
            debug!("Found existing expense: {}", expense_model.title);
            expense_model
        }
        Ok(None) => {
            warn!("Expense with ID {} not found for update", expense_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Expense not found".to_string(),
                }),
            ));
        }
        Err(db_error) => {
            error!(
                "Failed to lookup expense with ID {} for update: {}",
                expense_id, db_error
            );
            return Err(internal_error());
        }
    };

    // Update only fields present in the payload. Zero and empty-string values
    // count as real updates; only omitted fields keep their stored value.
    let mut expense_active: expense::ActiveModel = existing_expense.into();
    let mut updated_fields = Vec::new();

    if let Some(title) = request.title {
        debug!("Updating expense title to: {}", title);
        expense_active.title = Set(title.clone());
        updated_fields.push(format!("title: {}", title));
    }
    if let Some(description) = request.description {
        debug!("Updating expense description to: {:?}", description);
        expense_active.description = Set(description.clone());
        updated_fields.push(format!("description: {:?}", description));
    }
    if let Some(amount) = request.amount {
        debug!("Updating expense amount to: {}", amount);
        expense_active.amount = Set(amount);
        updated_fields.push(format!("amount: {}", amount));
    }
    if let Some(category) = category {
        debug!("Updating expense category to: {}", category);
        expense_active.category = Set(category);
        updated_fields.push(format!("category: {}", category));
    }
    if let Some(user_id) = request.user_id {
        debug!("Updating expense user_id to: {}", user_id);
        expense_active.user_id = Set(Some(user_id));
        updated_fields.push(format!("user_id: {}", user_id));
    }
    if let Some(date) = request.date {
        debug!("Updating expense date to: {}", date);
        expense_active.date = Set(date);
        updated_fields.push(format!("date: {}", date));
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for expense ID: {}", expense_id);
        return Ok(Json(MessageResponse {
            message: "Expense updated successfully".to_string(),
        }));
    }

    trace!("Attempting to update expense in database");
    if let Err(db_error) = expense_active.update(&txn).await {
        error!(
            "Failed to update expense with ID {}: {}",
            expense_id, db_error
        );
        return Err(internal_error());
    }

    if let Err(db_error) = txn.commit().await {
        error!(
            "Failed to commit update for expense ID {}: {}",
            expense_id, db_error
        );
        return Err(internal_error());
    }

    info!(
        "Expense with ID {} updated successfully. Updated fields: {}",
        expense_id,
        updated_fields.join(", ")
    );
    Ok(Json(MessageResponse {
        message: "Expense updated successfully".to_string(),
    }))
}

/// Delete an expense
#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    tag = "expenses",
    params(
        ("expense_id" = i32, Path, description = "Expense ID"),
    ),
    responses(
        (status = 200, description = "Expense deleted successfully", body = MessageResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_expense function for expense_id: {}", expense_id);
    debug!("Attempting to delete expense with ID: {}", expense_id);

    match expense::Entity::delete_by_id(expense_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            if delete_result.rows_affected > 0 {
                info!("Expense with ID {} deleted successfully", expense_id);
                Ok(Json(MessageResponse {
                    message: "Expense deleted successfully".to_string(),
                }))
            } else {
                warn!("Expense with ID {} not found for deletion", expense_id);
                Err((
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "Expense not found".to_string(),
                    }),
                ))
            }
        }
        Err(db_error) => {
            error!(
                "Failed to delete expense with ID {}: {}",
                expense_id, db_error
            );
            Err(internal_error())
        }
    }
}
