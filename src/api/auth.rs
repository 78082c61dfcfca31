use super::{
    ApiClient, ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile, UserSettingsRequest},
};

/// The unauthenticated `/auth` endpoints.
pub struct AuthClient<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthClient<'a> {
    pub(super) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Exchange an email and password for an access token.
    pub async fn log_in(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.api
            .send(self.api.post("/auth/login", None).json(request))
            .await
    }

    /// Create an account and sign it in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.api
            .send(self.api.post("/auth/register", None).json(request))
            .await
    }
}

/// The `/users/me` endpoints for the signed-in user.
pub struct UserClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl<'a> UserClient<'a> {
    pub(super) fn new(api: &'a ApiClient, token: &'a str) -> Self {
        Self { api, token }
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.api
            .send(self.api.get("/users/me", Some(self.token)))
            .await
    }

    /// Save the preferred currency and locale, returning the updated profile.
    pub async fn update_settings(
        &self,
        request: &UserSettingsRequest,
    ) -> Result<UserProfile, ApiError> {
        self.api
            .send(
                self.api
                    .patch("/users/me/settings", Some(self.token))
                    .json(request),
            )
            .await
    }
}
