use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foodgram_core::error::CoreError;
use foodgram_core::recipe::{RecipeViolations, ViolationKind};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error": ..., "code": ... }`, plus an `errors` array listing
/// every violation when a recipe fails validation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `foodgram_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A request body that could not be parsed as the expected JSON.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl From<RecipeViolations> for AppError {
    fn from(violations: RecipeViolations) -> Self {
        AppError::Core(CoreError::InvalidRecipe(violations))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Core(CoreError::InvalidRecipe(violations)) = &self {
            return invalid_recipe_response(violations);
        }

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::AlreadyExists(msg) => {
                    (StatusCode::BAD_REQUEST, "ALREADY_EXISTS", msg.clone())
                }
                CoreError::InvalidRecipe(violations) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    violations.to_string(),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::InvalidBody(rejection) => {
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 400 response for a rejected recipe draft.
///
/// `code` is the kind of the first violation; `errors` lists all of them.
fn invalid_recipe_response(violations: &RecipeViolations) -> Response {
    let code = violations
        .iter()
        .next()
        .map(|v| violation_code(v.kind))
        .unwrap_or("VALIDATION_ERROR");

    let body = json!({
        "error": violations.to_string(),
        "code": code,
        "errors": violations.0,
    });

    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

fn violation_code(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::MissingField => "MISSING_FIELD",
        ViolationKind::InvalidTag => "INVALID_TAG",
        ViolationKind::MalformedIngredient => "MALFORMED_INGREDIENT",
        ViolationKind::InvalidQuantity => "INVALID_QUANTITY",
        ViolationKind::DuplicateIngredient => "DUPLICATE_INGREDIENT",
        ViolationKind::InvalidCookingTime => "INVALID_COOKING_TIME",
        ViolationKind::FieldTooLong => "FIELD_TOO_LONG",
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 400 `ALREADY_EXISTS`.
/// - The ingredient amount check maps to 400 `INVALID_QUANTITY`.
/// - Foreign key violations map to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "ALREADY_EXISTS",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // check_violation
                Some("23514") if constraint == "ck_recipe_ingredients_amount" => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "INVALID_QUANTITY",
                        "Ingredient amount must be at least 1".to_string(),
                    );
                }
                // foreign_key_violation
                Some("23503") => {
                    return (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("Referenced entity not found: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
