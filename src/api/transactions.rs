use reqwest::multipart::{Form, Part};

use super::{
    ApiClient, ApiError,
    models::{
        BudgetId, PageRequest, PageResponse, Transaction, TransactionFilter, TransactionId,
        TransactionRequest,
    },
};

/// Newest transactions first.
const DEFAULT_SORT: &str = "transactionDate,desc";

/// The `/transactions` endpoints.
pub struct TransactionClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> TransactionClient<'a> {
    pub(super) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, ApiError> {
        let mut query = vec![
            ("page", page.page.to_string()),
            ("size", page.size.to_string()),
            ("sort", DEFAULT_SORT.to_owned()),
        ];
        query.extend(filter.query_pairs());

        self.api
            .send(self.api.get("/transactions", Some(self.token)).query(&query))
            .await
    }

    pub async fn get(&self, id: TransactionId) -> Result<Transaction, ApiError> {
        self.api
            .send(self.api.get(&format!("/transactions/{id}"), Some(self.token)))
            .await
    }

    pub async fn create(&self, request: &TransactionRequest) -> Result<Transaction, ApiError> {
        self.api
            .send(
                self.api
                    .post("/transactions", Some(self.token))
                    .json(request),
            )
            .await
    }

    pub async fn update(
        &self,
        id: TransactionId,
        request: &TransactionRequest,
    ) -> Result<Transaction, ApiError> {
        self.api
            .send(
                self.api
                    .put(&format!("/transactions/{id}"), Some(self.token))
                    .json(request),
            )
            .await
    }

    pub async fn delete(&self, id: TransactionId) -> Result<(), ApiError> {
        self.api
            .send_empty(
                self.api
                    .delete(&format!("/transactions/{id}"), Some(self.token)),
            )
            .await
    }

    /// Download every transaction of a budget as CSV.
    pub async fn export_csv(&self, budget_id: BudgetId) -> Result<Vec<u8>, ApiError> {
        self.api
            .send_raw(
                self.api
                    .get(&format!("/transactions/export/{budget_id}"), Some(self.token)),
            )
            .await
    }

    /// Upload a CSV file into a budget. Returns the number of imported transactions.
    pub async fn import_csv(
        &self,
        budget_id: BudgetId,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<u64, ApiError> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        self.api
            .send(
                self.api
                    .post(&format!("/transactions/import/{budget_id}"), Some(self.token))
                    .multipart(form),
            )
            .await
    }
}

#[cfg(test)]
mod transaction_client_tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header_exists, method, path, query_param},
    };

    use crate::api::{ApiClient, ApiError, PageRequest, TransactionFilter, TransactionType};

    #[tokio::test]
    async fn list_sends_sort_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(query_param("page", "1"))
            .and(query_param("size", "20"))
            .and(query_param("sort", "transactionDate,desc"))
            .and(query_param("type", "INCOME"))
            .and(query_param("search", "salary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "content": [{
                        "id": 1,
                        "description": "Salary",
                        "amount": 100.0,
                        "type": "INCOME",
                        "transactionDate": "2025-03-01",
                        "budgetId": 2
                    }],
                    "totalElements": 21,
                    "totalPages": 2,
                    "size": 20,
                    "number": 1
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let filter = TransactionFilter {
            transaction_type: Some(TransactionType::Income),
            search: Some("salary".to_owned()),
            ..Default::default()
        };

        let page = client
            .transactions("token")
            .list(&filter, PageRequest { page: 1, size: 20 })
            .await
            .unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.content[0].description, "Salary");
    }

    #[tokio::test]
    async fn export_returns_raw_csv() {
        let server = MockServer::start().await;
        let csv = "Fecha,Descripción,Monto,Tipo,Categoría,Notas\n2025-03-01,Salary,100.0,INCOME,,\n";
        Mock::given(method("GET"))
            .and(path("/transactions/export/2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/csv")
                    .set_body_string(csv),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let bytes = client.transactions("token").export_csv(2).await.unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), csv);
    }

    #[tokio::test]
    async fn import_uploads_multipart_and_returns_count() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions/import/2"))
            .and(header_exists("content-type"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "message": "ok", "data": 3})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let count = client
            .transactions("token")
            .import_csv(2, "march.csv", b"Fecha,Descripcion,Monto,Tipo\n".to_vec())
            .await
            .unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn delete_of_missing_transaction_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/transactions/8"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let result = client.transactions("token").delete(8).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
