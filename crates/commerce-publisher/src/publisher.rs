//! Idempotent upsert of course commerce state.
//!
//! One `PUT {base}/courses/{id}/` per call, no retries. The publisher is
//! cheap to clone; clones share the underlying connection pool.

use crate::config::PublisherConfig;
use crate::course::CourseView;
use crate::errors::PublishError;
use crate::serializer::serialize_course;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Header carrying the commerce API key.
pub const API_KEY_HEADER: &str = "X-Edx-Api-Key";

/// Connection timeout for the HTTP client.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Accepted response to a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishedStatus {
    /// 200: the course already existed and was replaced.
    Updated,
    /// 201: the course was created.
    Created,
}

#[derive(Debug, Clone)]
pub struct CommercePublisher {
    config: PublisherConfig,
    http_client: reqwest::Client,
}

impl CommercePublisher {
    /// Create a publisher.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Transport` if the HTTP client cannot be built.
    pub fn new(config: PublisherConfig) -> Result<Self, PublishError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(config.api_timeout))
            .build()
            .map_err(|e| PublishError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Publish `course`, returning whether the commerce API accepted it.
    ///
    /// Never fails. Every failure is logged at error level with the course id
    /// and enough context to diagnose it.
    pub async fn publish(&self, course: &CourseView) -> bool {
        match self.try_publish(course).await {
            Ok(status) => {
                info!(
                    target: "commerce.publisher",
                    course_id = %course.id,
                    status = ?status,
                    "Successfully published commerce data for course"
                );
                true
            }
            Err(PublishError::ConfigurationMissing) => {
                error!(
                    target: "commerce.publisher",
                    course_id = %course.id,
                    "COMMERCE_API_URL is not set. Commerce data will not be published"
                );
                false
            }
            Err(PublishError::RemoteRejected { status, body }) => {
                error!(
                    target: "commerce.publisher",
                    course_id = %course.id,
                    status,
                    body = %body,
                    "Failed to publish commerce data for course"
                );
                false
            }
            Err(e) => {
                error!(
                    target: "commerce.publisher",
                    course_id = %course.id,
                    error = %e,
                    "Failed to publish commerce data for course"
                );
                false
            }
        }
    }

    /// Publish `course` and report the failure kind.
    ///
    /// # Errors
    ///
    /// - `ConfigurationMissing` - no base URL; no request is sent
    /// - `Serialization` - a seat could not be serialized; no request is sent
    /// - `RemoteRejected` - any status other than 200 or 201
    /// - `Transport` - connection, DNS or timeout failure
    #[instrument(skip_all, fields(course_id = %course.id))]
    pub async fn try_publish(&self, course: &CourseView) -> Result<PublishedStatus, PublishError> {
        let url = self
            .config
            .course_url(&course.id)
            .ok_or(PublishError::ConfigurationMissing)?;

        let body = serialize_course(course)?;

        debug!(
            target: "commerce.publisher",
            url = %url,
            modes = body.modes.len(),
            "Publishing course to commerce API"
        );

        let response = self
            .http_client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.config.api_key_header())
            .timeout(self.config.api_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(target: "commerce.publisher", error = ?e, "HTTP request failed");
                PublishError::Transport(describe_transport_error(&e))
            })?;

        let status = response.status();
        match status {
            StatusCode::OK => Ok(PublishedStatus::Updated),
            StatusCode::CREATED => Ok(PublishedStatus::Created),
            _ => {
                let body = response.text().await.unwrap_or_else(|e| {
                    debug!(target: "commerce.publisher", error = %e, "Failed to read error response body");
                    "<failed to read body>".to_string()
                });
                Err(PublishError::RemoteRejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

/// Render a transport failure with its full `source()` chain.
///
/// reqwest's own Display stops at "error sending request for url"; the
/// DNS, TLS or socket cause is only reachable through the chain.
fn describe_transport_error(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    if e.is_timeout() {
        format!("request timed out: {message}")
    } else if e.is_connect() {
        format!("connection failed: {message}")
    } else {
        message
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn course() -> CourseView {
        CourseView {
            id: "demo".to_string(),
            name: "Demo".to_string(),
            verification_deadline: None,
            seats: Vec::new(),
        }
    }

    fn unconfigured() -> PublisherConfig {
        PublisherConfig::from_vars(&std::collections::HashMap::new()).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_url_is_configuration_missing() {
        let publisher = CommercePublisher::new(unconfigured()).unwrap();

        assert_eq!(
            publisher.try_publish(&course()).await,
            Err(PublishError::ConfigurationMissing)
        );
        assert!(!publisher.publish(&course()).await);
    }

    #[test]
    fn test_publisher_debug_redacts_api_key() {
        let config = PublisherConfig::new("http://localhost", "super-secret-key".into());
        let publisher = CommercePublisher::new(config).unwrap();

        let debug_str = format!("{publisher:?}");
        assert!(!debug_str.contains("super-secret-key"));
    }
}
