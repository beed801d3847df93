//! Wire types for the backend endpoints. Fields are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for `POST /api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// One row of a user search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Result of toggling one wish-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistToggle {
    pub item_id: String,
    /// True when the item is on the wish list after the toggle.
    pub wishlisted: bool,
}

/// A freshly issued rotating QR secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrToken {
    #[serde(alias = "qrData", alias = "token")]
    pub secret: String,
    #[serde(default)]
    pub expires_in_secs: Option<u64>,
}
