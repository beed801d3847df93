//! Cheers: client core for a social wish-list backend.
//!
//! This crate wraps the backend's authenticated HTTP endpoints (profile,
//! user search, wish list, QR secrets) behind an [`api::ApiClient`] with
//! exponential-backoff retries, and keeps a rotating QR secret fresh with a
//! [`refresher::CredentialRefresher`].
//!
//! # Quick start
//!
//! ```no_run
//! use cheers::api::ApiClient;
//! use cheers::config::load_config;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let client = ApiClient::new(&config.api, &config.retry);
//! let me = client.fetch_current_user("my-token").await.unwrap();
//! println!("{}", me.username);
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod refresher;
#[cfg(test)]
pub mod testsupport;
