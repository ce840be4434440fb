//! Uniform result envelope for backend calls
//!
//! Every call resolves to an [`ApiResponse`]; failures are never raised.
//! Status codes are mapped to the messages shown to the user here.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Error;

pub const NETWORK_ERROR: &str = "Network error occurred";
pub const SESSION_EXPIRED: &str = "Sesión expirada. Inicia sesión de nuevo";
pub const EMAIL_TAKEN: &str = "El correo ya está registrado";
pub const BAD_REQUEST: &str = "Solicitud inválida";

/// `{success, data | error, status}` for one request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn ok(status: u16, data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: Some(status),
        }
    }

    pub(crate) fn failure(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            status,
        }
    }

    pub(crate) fn network_error() -> Self {
        Self::failure(None, NETWORK_ERROR)
    }

    /// The error message, or `fallback` when the failure carried none
    pub fn error_or(&self, fallback: &str) -> String {
        self.error.clone().unwrap_or_else(|| fallback.to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(StatusCode::UNAUTHORIZED.as_u16())
    }

    /// Convert into a `Result`, treating a success without data as an error
    pub fn into_result(self) -> Result<T, Error> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(Error::EmptyResponse),
            (false, _) => Err(Error::Api {
                status: self.status,
                message: self.error.unwrap_or_else(|| NETWORK_ERROR.to_string()),
            }),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            status: self.status,
        }
    }
}

/// Message shown for a non-2xx answer. `body` is the parsed JSON body,
/// or `Value::Null` when the server sent none.
pub fn error_message(status: StatusCode, body: &Value) -> String {
    let server_message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty());

    match status {
        StatusCode::CONFLICT => EMAIL_TAKEN.to_string(),
        StatusCode::UNAUTHORIZED => SESSION_EXPIRED.to_string(),
        StatusCode::BAD_REQUEST => server_message.unwrap_or(BAD_REQUEST).to_string(),
        _ => server_message
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP Error: {}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        let msg = json!({ "message": "Credenciales inválidas" });
        assert_eq!(error_message(StatusCode::CONFLICT, &msg), EMAIL_TAKEN);
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, &msg), SESSION_EXPIRED);
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, &msg),
            "Credenciales inválidas"
        );
        assert_eq!(error_message(StatusCode::BAD_REQUEST, &Value::Null), BAD_REQUEST);
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null),
            "HTTP Error: 500"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, &json!({ "message": "No existe" })),
            "No existe"
        );
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResponse<u8> = ApiResponse::ok(200, 7);
        assert_eq!(ok.into_result().unwrap(), 7);

        let failed: ApiResponse<u8> = ApiResponse::failure(Some(404), "No existe");
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "No existe");

        let network: ApiResponse<u8> = ApiResponse::network_error();
        assert_eq!(network.status, None);
        assert_eq!(network.error_or("x"), NETWORK_ERROR);
    }
}
