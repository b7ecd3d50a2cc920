/// Route handlers, organized by resource:
///
/// - `health`: health check
/// - `auth`: API token login, dashboard sign-in and logout
/// - `apartments`: apartment JSON API
/// - `residents`: resident JSON API
/// - `dashboard`: server-rendered resident pages and form posts

pub mod apartments;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod residents;

use crate::views::ErrorPage;
use serde::{Deserialize, Serialize};

/// `{"message": ...}` body for successful deletes
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ErrorPage {
    ErrorPage::not_found()
}
