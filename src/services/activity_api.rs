// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the activity API.
//!
//! Speaks the request/response contract served by [`crate::routes::api`]:
//! `POST /api/activities` answers 201 with the stored record, or 400 with
//! an error body describing the rejected field.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{CompletedActivity, NewActivity};
use crate::services::activity_store::{ActivityStore, PersistenceError};

/// Activity store reached over HTTP.
#[derive(Clone)]
pub struct HttpActivityStore {
    http: reqwest::Client,
    base_url: String,
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    details: Option<String>,
}

impl HttpActivityStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Post an activity and return the stored record.
    pub async fn create_activity(
        &self,
        activity: &NewActivity,
    ) -> Result<CompletedActivity, PersistenceError> {
        let url = format!("{}/api/activities", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(activity)
            .send()
            .await
            .map_err(|e| PersistenceError::Http(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<CompletedActivity>()
                .await
                .map_err(|e| PersistenceError::Http(format!("Invalid response body: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let reason = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.details.unwrap_or(b.error))
                .unwrap_or(body);
            return Err(PersistenceError::Validation(reason));
        }

        tracing::warn!(status = status.as_u16(), "Activity API error");
        Err(PersistenceError::Unexpected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ActivityStore for HttpActivityStore {
    async fn save(&self, activity: NewActivity) -> Result<u64, PersistenceError> {
        self.create_activity(&activity).await.map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpActivityStore::new("http://localhost:8080/");
        assert_eq!(store.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error":"bad_request","details":"route too short"}"#).unwrap();
        assert_eq!(body.details.as_deref(), Some("route too short"));
        assert_eq!(body.error, "bad_request");
    }
}
