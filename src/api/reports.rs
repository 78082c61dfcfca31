use super::{
    ApiClient, ApiError,
    models::{DashboardQuery, DashboardReport},
};

/// The `/reports` endpoints.
pub struct ReportClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> ReportClient<'a> {
    pub(super) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn dashboard(&self, query: DashboardQuery) -> Result<DashboardReport, ApiError> {
        self.api
            .send(
                self.api
                    .get("/reports/dashboard", Some(self.token))
                    .query(&query.query_pairs()),
            )
            .await
    }
}

#[cfg(test)]
mod report_client_tests {
    use std::time::Duration;

    use serde_json::json;
    use time::macros::date;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use crate::api::{ApiClient, DashboardQuery};

    #[tokio::test]
    async fn dashboard_sends_date_range() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reports/dashboard"))
            .and(query_param("startDate", "2025-01-01"))
            .and(query_param("endDate", "2025-06-30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "totalIncome": 100.0,
                    "totalExpenses": 40.0,
                    "balance": 60.0,
                    "budgetUsagePercentage": 40.0,
                    "categoryBreakdown": [
                        {"categoryName": "Food", "color": "#ff0000", "amount": 40.0, "percentage": 100.0}
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap();

        let report = client
            .reports("token")
            .dashboard(DashboardQuery {
                start_date: Some(date!(2025 - 01 - 01)),
                end_date: Some(date!(2025 - 06 - 30)),
            })
            .await
            .unwrap();

        assert_eq!(report.balance, 60.0);
        assert_eq!(report.category_breakdown.len(), 1);
    }
}
