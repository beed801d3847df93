//! Rotating QR secret issuance.

use async_trait::async_trait;
use std::sync::Arc;

use super::client::ApiClient;
use super::request::ApiRequest;
use super::types::QrToken;
use crate::error::ApiError;
use crate::refresher::SecretSource;

const QR_TOKEN_ENDPOINT: &str = "/api/qr/token";

impl ApiClient {
    /// `POST /api/qr/token`. Single attempt; the refresher owns the cadence.
    pub async fn issue_qr_token(&self, token: &str) -> Result<QrToken, ApiError> {
        self.request(ApiRequest::post(QR_TOKEN_ENDPOINT).bearer(token))
            .await
    }
}

/// Feeds a [`CredentialRefresher`](crate::refresher::CredentialRefresher)
/// from the backend on behalf of one signed-in user.
pub struct QrSecretSource {
    client: Arc<ApiClient>,
    token: String,
}

impl QrSecretSource {
    pub fn new(client: Arc<ApiClient>, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }
}

#[async_trait]
impl SecretSource for QrSecretSource {
    async fn issue_secret(&self) -> Result<String, ApiError> {
        Ok(self.client.issue_qr_token(&self.token).await?.secret)
    }
}
