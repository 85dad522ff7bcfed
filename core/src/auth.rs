use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::gateway::ApiGateway;
use crate::result::{handle_error, ApiResult, NormalizedResult, ServiceResponse};

pub const REGISTER_PATH: &str = "/register/";
pub const LOGIN_PATH: &str = "/login/";
pub const LOGOUT_PATH: &str = "/logout/";
pub const PROFILE_PATH: &str = "/profile/";

/// Sign-up form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login form payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile editor payload. The password is only sent when it is being changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Authentication and profile calls against the remote API
#[derive(Debug, Clone)]
pub struct AuthService {
    gateway: ApiGateway,
    cancel: Option<CancellationToken>,
}

impl AuthService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            cancel: None,
        }
    }

    /// A copy of this service whose calls are abandoned once `token` is cancelled
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            gateway: self.gateway.clone(),
            cancel: Some(token),
        }
    }

    pub fn gateway(&self) -> &ApiGateway {
        &self.gateway
    }

    #[instrument(skip_all)]
    pub async fn register<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.send(Method::POST, REGISTER_PATH, data, StatusCode::CREATED)
            .await
    }

    /// On success `data` holds the session payload to persist
    #[instrument(skip_all)]
    pub async fn login<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.send(Method::POST, LOGIN_PATH, data, StatusCode::OK).await
    }

    #[instrument(skip_all)]
    pub async fn logout<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.send(Method::POST, LOGOUT_PATH, data, StatusCode::CREATED)
            .await
    }

    #[instrument(skip_all)]
    pub async fn update_profile<T: Serialize + ?Sized>(&self, data: &T) -> ApiResult {
        self.send(Method::PATCH, PROFILE_PATH, data, StatusCode::OK)
            .await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        data: &T,
        expected: StatusCode,
    ) -> ApiResult {
        match self
            .gateway
            .call(method, path, Some(data), self.cancel.as_ref())
            .await
        {
            Ok(response) if response.status == expected => {
                info!(path, "Call succeeded");
                Ok(ServiceResponse::new(response.body.unwrap_or_default()))
            }
            Ok(response) => {
                warn!(path, status = %response.status, expected = %expected, "Unexpected response status");
                Err(NormalizedResult::failure(
                    Some(response.status.as_u16()),
                    "Unexpected response status",
                ))
            }
            Err(failure) => Err(handle_error(&failure)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_field_names() {
        let request = RegisterRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": "jane@example.com",
                "password": "secret"
            })
        );
    }

    #[test]
    fn test_profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"name": "Jane", "lastName": "Doe"})
        );
    }
}
