//! Account endpoints

use serde::Serialize;
use serde_json::{json, Value};
use streamia_core::{AuthPayload, Credentials, ProfileUpdate, Registration, User};

use crate::client::ApiClient;
use crate::response::ApiResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    token: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

impl ApiClient {
    /// `POST /api/users/login`
    pub async fn login(&self, credentials: &Credentials) -> ApiResponse<AuthPayload> {
        self.post("/api/users/login", Some(credentials)).await
    }

    /// `POST /api/users/register`
    pub async fn register(&self, registration: &Registration) -> ApiResponse<AuthPayload> {
        self.post("/api/users/register", Some(registration)).await
    }

    /// `POST /api/users/logout`
    pub async fn logout(&self) -> ApiResponse<Value> {
        self.post::<Value, Value>("/api/users/logout", None).await
    }

    /// `POST /api/users/recover-password`
    pub async fn recover_password(&self, email: &str) -> ApiResponse<Value> {
        self.post("/api/users/recover-password", Some(&json!({ "email": email })))
            .await
    }

    /// `POST /api/users/reset-password` with the token from the recovery email
    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm_password: &str,
    ) -> ApiResponse<Value> {
        let body = ResetPasswordBody {
            token,
            password,
            confirm_password,
        };
        self.post("/api/users/reset-password", Some(&body)).await
    }

    /// `GET /api/users/profile`
    pub async fn profile(&self) -> ApiResponse<User> {
        self.get("/api/users/profile").await
    }

    /// `PUT /api/users/profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResponse<User> {
        self.put("/api/users/profile", update).await
    }

    /// `DELETE /api/users/account`
    pub async fn delete_account(&self) -> ApiResponse<Value> {
        self.delete("/api/users/account").await
    }
}
