//! Defines the endpoint for downloading a budget's transactions as CSV.

use axum::{
    Extension,
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    api::{ApiClient, BudgetId},
    auth::Session,
};

const EXPORT_FILE_NAME: &str = "transacciones.csv";

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub budget_id: BudgetId,
}

/// A route handler that streams the API's CSV export of one budget as a download.
pub async fn export_transactions_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    Query(query): Query<ExportQuery>,
) -> Response {
    match api
        .transactions(&session.access_token)
        .export_csv(query.budget_id)
        .await
    {
        Ok(contents) => {
            tracing::debug!(
                "Exporting {} bytes of transactions for budget {}",
                contents.len(),
                query.budget_id
            );
            (
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                    ),
                ],
                contents,
            )
                .into_response()
        }
        Err(error) => Error::from(error).into_response(),
    }
}
