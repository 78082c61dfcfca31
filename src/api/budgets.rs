use super::{
    ApiClient, ApiError,
    models::{Budget, BudgetId, BudgetRequest, PageRequest, PageResponse},
};

/// The `/budgets` endpoints.
pub struct BudgetClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> BudgetClient<'a> {
    pub(super) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn list(&self, page: PageRequest) -> Result<PageResponse<Budget>, ApiError> {
        self.api
            .send(self.api.get("/budgets", Some(self.token)).query(&page))
            .await
    }

    pub async fn get(&self, id: BudgetId) -> Result<Budget, ApiError> {
        self.api
            .send(self.api.get(&format!("/budgets/{id}"), Some(self.token)))
            .await
    }

    pub async fn create(&self, request: &BudgetRequest) -> Result<Budget, ApiError> {
        self.api
            .send(self.api.post("/budgets", Some(self.token)).json(request))
            .await
    }

    pub async fn update(&self, id: BudgetId, request: &BudgetRequest) -> Result<Budget, ApiError> {
        self.api
            .send(
                self.api
                    .put(&format!("/budgets/{id}"), Some(self.token))
                    .json(request),
            )
            .await
    }

    pub async fn delete(&self, id: BudgetId) -> Result<(), ApiError> {
        self.api
            .send_empty(self.api.delete(&format!("/budgets/{id}"), Some(self.token)))
            .await
    }
}

#[cfg(test)]
mod budget_client_tests {
    use std::time::Duration;

    use serde_json::json;
    use time::macros::date;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, method, path, query_param},
    };

    use crate::api::{ApiClient, ApiError, BudgetPeriod, BudgetRequest, PageRequest};

    fn budget_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Marzo",
            "totalAmount": 1000.0,
            "spentAmount": 950.0,
            "remainingAmount": 50.0,
            "usagePercentage": 95.0,
            "period": "MONTHLY",
            "startDate": "2025-03-01",
            "endDate": "2025-03-31",
            "currency": "COP",
            "active": true,
            "createdAt": "2025-03-01T00:00:00"
        })
    }

    #[tokio::test]
    async fn list_sends_zero_based_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/budgets"))
            .and(query_param("page", "0"))
            .and(query_param("size", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "content": [budget_json(1)],
                    "totalElements": 1,
                    "totalPages": 1,
                    "size": 10,
                    "number": 0
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let page = client
            .budgets("token")
            .list(PageRequest { page: 0, size: 10 })
            .await
            .unwrap();

        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn create_posts_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/budgets"))
            .and(body_json(json!({
                "name": "Marzo",
                "totalAmount": 1000.0,
                "period": "MONTHLY",
                "startDate": "2025-03-01",
                "endDate": "2025-03-31",
                "currency": "COP"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"success": true, "data": budget_json(9)})),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let budget = client
            .budgets("token")
            .create(&BudgetRequest {
                name: "Marzo".to_owned(),
                total_amount: 1000.0,
                period: BudgetPeriod::Monthly,
                start_date: date!(2025 - 03 - 01),
                end_date: date!(2025 - 03 - 31),
                currency: Some("COP".to_owned()),
            })
            .await
            .unwrap();

        assert_eq!(budget.id, 9);
    }

    #[tokio::test]
    async fn get_missing_budget_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/budgets/42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "success": false,
                "message": "Presupuesto no encontrado"
            })))
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let result = client.budgets("token").get(42).await;

        assert!(
            matches!(result, Err(ApiError::NotFound(message)) if message == "Presupuesto no encontrado")
        );
    }

    #[tokio::test]
    async fn delete_accepts_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/budgets/3"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        client.budgets("token").delete(3).await.unwrap();
    }
}
