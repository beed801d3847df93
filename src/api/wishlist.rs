//! Wish-list mutations. Each call is a single attempt.

use serde_json::json;

use super::client::ApiClient;
use super::request::ApiRequest;
use super::types::WishlistToggle;
use crate::error::ApiError;

const WISHLIST_TOGGLE_ENDPOINT: &str = "/api/wishlist/toggle";

impl ApiClient {
    /// `POST /api/wishlist/toggle` with `{"itemId": ...}`.
    pub async fn toggle_wishlist_item(
        &self,
        token: &str,
        item_id: &str,
    ) -> Result<WishlistToggle, ApiError> {
        if item_id.trim().is_empty() {
            return Err(ApiError::InvalidRequest("item id must not be empty".into()));
        }
        let request = ApiRequest::post(WISHLIST_TOGGLE_ENDPOINT)
            .bearer(token)
            .json(&json!({ "itemId": item_id }))?;
        self.request(request).await
    }
}
