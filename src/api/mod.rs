//! HTTP client for the backend REST API.
//!
//! The API layer is split into cohesive modules:
//! - `request`: request descriptors and header construction
//! - `transport`: the network seam plus the reqwest implementation
//! - `hook`: request/failure observation
//! - `client`: dispatch and error normalization
//! - `retry`: exponential backoff for idempotent reads
//! - `users`, `wishlist`, `qr`: endpoint helpers on [`ApiClient`]

mod client;
mod hook;
mod qr;
mod request;
mod retry;
mod transport;
mod types;
mod users;
mod wishlist;

pub use client::ApiClient;
pub use hook::{RequestHook, TracingHook};
pub use qr::QrSecretSource;
pub use request::{ApiRequest, HttpRequest, RequestBody};
pub use retry::{fetch_with_retry, RetryPolicy};
pub use transport::{HttpResponse, ReqwestTransport, Transport};
pub use types::{NewUser, QrToken, User, UserSummary, WishlistToggle};
