//! Buffered HTTP response

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Error, Result};

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Whether the status is 400 or above.
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }

    /// Turn an error status into a classified [`ApiError`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_error() {
            return Err(Error::Api(ApiError::from_response(
                self.status.as_u16(),
                &self.headers,
                &self.body,
            )));
        }
        Ok(self)
    }

    /// Check the status, then decode the body as JSON.
    ///
    /// # Errors
    ///
    /// - `Error::Api` for status ≥ 400
    /// - `Error::ResponseValidation` if a success body does not decode into `T`
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.error_for_status()?;
        serde_json::from_slice(&response.body)
            .map_err(|e| Error::ResponseValidation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[derive(Debug, serde::Deserialize)]
    struct Payload {
        id: String,
    }

    #[test]
    fn test_into_result_success() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), r#"{"id":"x"}"#);
        let payload: Payload = response.into_result().unwrap();
        assert_eq!(payload.id, "x");
    }

    #[test]
    fn test_into_result_error_status() {
        let response = Response::new(
            StatusCode::SERVICE_UNAVAILABLE,
            HeaderMap::new(),
            r#"{"error":{"code":"unavailable","message":"down"}}"#,
        );
        let err = response.into_result::<Payload>().unwrap_err();
        assert_matches!(&err, Error::Api(api) if api.status_code() == 503 && api.is_retryable());
    }

    #[test]
    fn test_into_result_malformed_success_body() {
        let response = Response::new(StatusCode::OK, HeaderMap::new(), "not json");
        assert_matches!(
            response.into_result::<Payload>(),
            Err(Error::ResponseValidation(_))
        );
    }

    #[test]
    fn test_redirect_status_is_not_error() {
        let response = Response::new(StatusCode::FOUND, HeaderMap::new(), Bytes::new());
        assert!(!response.is_error());
        assert!(response.error_for_status().is_ok());
    }
}
