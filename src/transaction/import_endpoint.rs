//! Defines the endpoint for importing transactions from a CSV file into a budget.

use axum::{
    Extension,
    extract::{Multipart, State, multipart::Field},
    response::{IntoResponse, Response},
};
use axum_htmx::HxResponseTrigger;

use crate::{
    Error,
    alert::Alert,
    api::{ApiClient, BudgetId},
    auth::Session,
    transaction::{
        csv_validation::validate_transactions_csv,
        transactions_page::TRANSACTIONS_IMPORTED_EVENT,
    },
};

const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug)]
struct CsvUpload {
    budget_id: BudgetId,
    file_name: String,
    contents: Vec<u8>,
}

async fn read_csv_field(field: Field<'_>) -> Result<(String, Vec<u8>), Error> {
    if field.content_type() != Some(CSV_CONTENT_TYPE) {
        return Err(Error::NotCsv);
    }

    let file_name = field
        .file_name()
        .map(str::to_owned)
        .ok_or_else(|| Error::MultipartError("the file field has no file name".to_owned()))?;

    let contents = field.bytes().await.map_err(|error| {
        tracing::error!("Could not read data from multipart form field: {error}");
        Error::MultipartError(error.to_string())
    })?;

    Ok((file_name, contents.to_vec()))
}

async fn read_upload(mut multipart: Multipart) -> Result<CsvUpload, Error> {
    let mut budget_id = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        match field.name() {
            Some("budget_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?;
                budget_id = text.trim().parse::<BudgetId>().ok();
            }
            Some("file") => file = Some(read_csv_field(field).await?),
            other => tracing::debug!("Ignoring multipart field {other:?}"),
        }
    }

    let budget_id = budget_id
        .ok_or_else(|| Error::MultipartError("the budget_id field is missing".to_owned()))?;
    let (file_name, contents) =
        file.ok_or_else(|| Error::MultipartError("the file field is missing".to_owned()))?;

    Ok(CsvUpload {
        budget_id,
        file_name,
        contents,
    })
}

/// A route handler for importing a CSV file of transactions into a budget.
///
/// The file is checked before it is sent to the API, and the first bad row is
/// reported without importing anything. On success the transactions table is
/// told to reload.
pub async fn import_transactions_endpoint(
    State(api): State<ApiClient>,
    Extension(session): Extension<Session>,
    multipart: Multipart,
) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(error) => return error.into_alert_response(),
    };

    let row_count = match validate_transactions_csv(&upload.contents) {
        Ok(row_count) => row_count,
        Err(error) => {
            tracing::warn!("Rejected CSV upload {}: {error}", upload.file_name);
            return error.into_alert_response();
        }
    };
    tracing::debug!(
        "Uploading {row_count} rows from {} to budget {}",
        upload.file_name,
        upload.budget_id
    );

    match api
        .transactions(&session.access_token)
        .import_csv(upload.budget_id, &upload.file_name, upload.contents)
        .await
    {
        Ok(imported) => {
            tracing::info!(
                "Imported {imported} transactions into budget {}",
                upload.budget_id
            );
            (
                HxResponseTrigger::normal([TRANSACTIONS_IMPORTED_EVENT]),
                Alert::Success {
                    message: format!("Imported {imported} transactions"),
                    details: format!("From {}.", upload.file_name),
                },
            )
                .into_response()
        }
        Err(error) => Error::from(error).into_alert_response(),
    }
}
