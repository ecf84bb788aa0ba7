//! REST client for the assessment test collection.

use crate::config::{AuthConfig, TuiConfig};
use assessor_core::{
    AssessmentStore, AssessmentTest, StoreError, TestId, TestPayload, UpdateTestPayload,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;

/// Collection path under the configured base URL.
pub const COLLECTION_PATH: &str = "/api/assessment-test";

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }

    /// Fold into the collaborator error. A 404 on a request for `id` is
    /// `NotFound`; everything else is a transport failure.
    pub fn into_store_error(self, id: Option<&TestId>) -> StoreError {
        match id {
            Some(id) if self.is_not_found() => StoreError::NotFound { id: id.clone() },
            _ => StoreError::transport(self.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let auth_header = build_auth_headers(&config.auth)?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, COLLECTION_PATH)
    }

    pub fn item_url(&self, id: &TestId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    pub async fn list_tests(&self) -> Result<Vec<AssessmentTest>, ApiClientError> {
        let response = self
            .client
            .get(self.collection_url())
            .headers(self.auth_header.clone())
            .send()
            .await?;
        self.parse_response(response).await
    }

    pub async fn get_test(&self, id: &TestId) -> Result<AssessmentTest, ApiClientError> {
        let response = self
            .client
            .get(self.item_url(id))
            .headers(self.auth_header.clone())
            .send()
            .await?;
        self.parse_response(response).await
    }

    pub async fn create_test(&self, payload: &TestPayload) -> Result<AssessmentTest, ApiClientError> {
        let response = self
            .client
            .post(self.collection_url())
            .headers(self.auth_header.clone())
            .json(payload)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// `PATCH` on the collection; the body carries `_id`.
    pub async fn update_test(
        &self,
        payload: &UpdateTestPayload,
    ) -> Result<AssessmentTest, ApiClientError> {
        let response = self
            .client
            .patch(self.collection_url())
            .headers(self.auth_header.clone())
            .json(payload)
            .send()
            .await?;
        self.parse_response(response).await
    }

    /// `DELETE` on the collection with the bare id as a text body.
    pub async fn delete_test(&self, id: &TestId) -> Result<(), ApiClientError> {
        let response = self
            .client
            .delete(self.collection_url())
            .headers(self.auth_header.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(id.as_str().to_owned())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() {
            return Ok(serde_json::from_str::<T>(&text)?);
        }
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body: text,
        })
    }
}

#[async_trait]
impl AssessmentStore for RestClient {
    async fn list(&self) -> Result<Vec<AssessmentTest>, StoreError> {
        self.list_tests().await.map_err(|e| {
            tracing::warn!(error = %e, "GET assessment tests failed");
            e.into_store_error(None)
        })
    }

    async fn get(&self, id: &TestId) -> Result<AssessmentTest, StoreError> {
        self.get_test(id).await.map_err(|e| {
            tracing::warn!(test_id = %id, error = %e, "GET assessment test failed");
            e.into_store_error(Some(id))
        })
    }

    async fn create(&self, payload: &TestPayload) -> Result<AssessmentTest, StoreError> {
        self.create_test(payload).await.map_err(|e| {
            tracing::warn!(error = %e, "POST assessment test failed");
            e.into_store_error(None)
        })
    }

    async fn update(&self, payload: &UpdateTestPayload) -> Result<AssessmentTest, StoreError> {
        self.update_test(payload).await.map_err(|e| {
            tracing::warn!(test_id = %payload.id, error = %e, "PATCH assessment test failed");
            e.into_store_error(Some(&payload.id))
        })
    }

    async fn delete(&self, id: &TestId) -> Result<(), StoreError> {
        self.delete_test(id).await.map_err(|e| {
            tracing::warn!(test_id = %id, error = %e, "DELETE assessment test failed");
            e.into_store_error(None)
        })
    }
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(jwt) = &auth.jwt {
        let value = format!("Bearer {}", jwt);
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&value).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeConfig;

    fn config(base: &str) -> TuiConfig {
        TuiConfig {
            api_base_url: base.to_string(),
            auth: AuthConfig {
                api_key: Some("k".to_string()),
                jwt: Some("t".to_string()),
            },
            request_timeout_ms: 1_000,
            refresh_interval_ms: 250,
            error_log_path: "assessor.log".into(),
            log_filter: "info".to_string(),
            theme: ThemeConfig {
                name: "synthbrute".to_string(),
            },
        }
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = RestClient::new(&config("http://localhost:3000/")).unwrap();
        assert_eq!(
            client.collection_url(),
            "http://localhost:3000/api/assessment-test"
        );
        assert_eq!(
            client.item_url(&TestId::new("abc")),
            "http://localhost:3000/api/assessment-test/abc"
        );
    }

    #[test]
    fn test_auth_headers() {
        let headers = build_auth_headers(&config("http://x").auth).unwrap();
        assert_eq!(headers.get("x-api-key").unwrap(), "k");
        assert_eq!(headers.get("authorization").unwrap(), "Bearer t");
    }

    #[test]
    fn test_404_maps_to_not_found_only_with_id() {
        let id = TestId::new("gone");
        let err = ApiClientError::Status {
            status: 404,
            body: String::new(),
        };
        assert_eq!(
            err.into_store_error(Some(&id)),
            StoreError::NotFound { id: id.clone() }
        );

        let err = ApiClientError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(!err.into_store_error(None).is_not_found());

        let err = ApiClientError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(matches!(
            err.into_store_error(Some(&id)),
            StoreError::Transport { reason } if reason.contains("500")
        ));
    }
}
