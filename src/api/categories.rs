use super::{
    ApiClient, ApiError,
    models::{Category, CategoryId, CategoryRequest},
};

/// The `/categories` endpoints. The category list is not paged.
pub struct CategoryClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> CategoryClient<'a> {
    pub(super) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        self.api
            .send(self.api.get("/categories", Some(self.token)))
            .await
    }

    /// Find a single category in the list, the API has no endpoint for one category.
    pub async fn get(&self, id: CategoryId) -> Result<Category, ApiError> {
        self.list()
            .await?
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| ApiError::NotFound("Category not found".to_owned()))
    }

    pub async fn create(&self, request: &CategoryRequest) -> Result<Category, ApiError> {
        self.api
            .send(self.api.post("/categories", Some(self.token)).json(request))
            .await
    }

    pub async fn update(
        &self,
        id: CategoryId,
        request: &CategoryRequest,
    ) -> Result<Category, ApiError> {
        self.api
            .send(
                self.api
                    .put(&format!("/categories/{id}"), Some(self.token))
                    .json(request),
            )
            .await
    }

    pub async fn delete(&self, id: CategoryId) -> Result<(), ApiError> {
        self.api
            .send_empty(
                self.api
                    .delete(&format!("/categories/{id}"), Some(self.token)),
            )
            .await
    }
}
