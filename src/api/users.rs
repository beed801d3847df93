//! User endpoints: current profile, sign-up and search.

use tracing::info;

use super::client::ApiClient;
use super::request::ApiRequest;
use super::retry::fetch_with_retry;
use super::types::{NewUser, User, UserSummary};
use crate::error::ApiError;

const USER_ENDPOINT: &str = "/api/user";
const USER_SEARCH_ENDPOINT: &str = "/api/users/search";

impl ApiClient {
    /// `GET /api/user`, retried per the client's retry policy.
    ///
    /// A missing profile surfaces as [`ApiError::EntityNotFound`].
    pub async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError> {
        fetch_with_retry(self.retry_policy(), move || {
            self.request(ApiRequest::get(USER_ENDPOINT).bearer(token))
        })
        .await
    }

    /// `POST /api/user`. Single attempt.
    pub async fn create_user(&self, token: &str, new_user: &NewUser) -> Result<User, ApiError> {
        let request = ApiRequest::post(USER_ENDPOINT).bearer(token).json(new_user)?;
        self.request(request).await
    }

    /// Fetch the current user, creating the profile when the backend reports
    /// it does not exist yet.
    pub async fn fetch_or_create_user(
        &self,
        token: &str,
        new_user: &NewUser,
    ) -> Result<User, ApiError> {
        match self.fetch_current_user(token).await {
            Err(ApiError::EntityNotFound) => {
                info!(username = %new_user.username, "no profile yet; creating user");
                self.create_user(token, new_user).await
            }
            other => other,
        }
    }

    /// `GET /api/users/search?username=<query>`, retried like other reads.
    pub async fn search_users(&self, token: &str, query: &str) -> Result<Vec<UserSummary>, ApiError> {
        let endpoint = search_endpoint(query);
        fetch_with_retry(self.retry_policy(), || {
            self.request(ApiRequest::get(endpoint.as_str()).bearer(token))
        })
        .await
    }
}

fn search_endpoint(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{USER_SEARCH_ENDPOINT}?username={encoded}")
}
