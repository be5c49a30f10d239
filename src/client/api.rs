//! HTTP client for the board API

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::health::HealthResponse;
use crate::models::investment::{
    DeleteItemResponse, ErrorResponse, GroupedItems, InvestmentItem, ItemPatch, ItemStatus,
    NewItem, StatusUpdateRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; `message` comes from the server's `{message}` body
    #[error("{message} (HTTP {code})")]
    Status { code: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { code: 404, .. })
    }
}

/// Operations the board synchronizer needs from the server
#[async_trait]
pub trait InvestmentApi: Send + Sync {
    /// `Ok(false)` means the password was rejected
    async fn login(&self, password: &str) -> Result<bool, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
    async fn get_all(&self) -> Result<GroupedItems, ClientError>;
    async fn get_by_id(&self, id: &str) -> Result<InvestmentItem, ClientError>;
    async fn create(&self, item: &NewItem) -> Result<InvestmentItem, ClientError>;
    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<InvestmentItem, ClientError>;
    async fn update_status(
        &self,
        id: &str,
        status: ItemStatus,
    ) -> Result<InvestmentItem, ClientError>;
    async fn delete(&self, id: &str) -> Result<DeleteItemResponse, ClientError>;
}

#[derive(Clone)]
pub struct HttpInvestmentApi {
    client: Client,
    base_url: String,
}

impl HttpInvestmentApi {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| "Request failed".to_string());
            debug!(status = %status, message = %message, "API request failed");
            return Err(ClientError::Status {
                code: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl InvestmentApi for HttpInvestmentApi {
    async fn login(&self, password: &str) -> Result<bool, ClientError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest {
                password: password.to_string(),
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Ok(false),
            status if status.is_success() => {
                let body: LoginResponse = serde_json::from_slice(&response.bytes().await?)?;
                Ok(body.success)
            }
            status => Err(ClientError::Status {
                code: status.as_u16(),
                message: "Login failed".to_string(),
            }),
        }
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    async fn get_all(&self) -> Result<GroupedItems, ClientError> {
        self.send(self.client.get(self.url("/investments"))).await
    }

    async fn get_by_id(&self, id: &str) -> Result<InvestmentItem, ClientError> {
        self.send(self.client.get(self.url(&format!("/investments/{}", id))))
            .await
    }

    async fn create(&self, item: &NewItem) -> Result<InvestmentItem, ClientError> {
        self.send(self.client.post(self.url("/investments")).json(item))
            .await
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<InvestmentItem, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("/investments/{}", id)))
                .json(patch),
        )
        .await
    }

    async fn update_status(
        &self,
        id: &str,
        status: ItemStatus,
    ) -> Result<InvestmentItem, ClientError> {
        self.send(
            self.client
                .patch(self.url(&format!("/investments/{}/status", id)))
                .json(&StatusUpdateRequest {
                    status: status.as_str().to_string(),
                }),
        )
        .await
    }

    async fn delete(&self, id: &str) -> Result<DeleteItemResponse, ClientError> {
        self.send(self.client.delete(self.url(&format!("/investments/{}", id))))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let api = HttpInvestmentApi::new("http://localhost:5000/api/");
        assert_eq!(api.url("/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn test_not_found_detection() {
        let err = ClientError::Status {
            code: 404,
            message: "Item not found".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Item not found (HTTP 404)");
    }
}
