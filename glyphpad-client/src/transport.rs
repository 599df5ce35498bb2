//! Classifier transport: the trait seam and its HTTP implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

use glyphpad_core::{alphabet, Snapshot};

use crate::error::{SubmitError, SubmitResult};

/// Confidence bands used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// Above 75%.
    High,
    /// 50% to 75%.
    Medium,
    /// Below 50%.
    Low,
}

impl std::fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// A classification returned by the remote service.
///
/// The label is displayed as-is (capitalized); it is never validated
/// against the reference alphabet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The label the classifier predicted.
    #[serde(rename = "predicted_letter")]
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

impl Classification {
    /// Confidence as a percentage rounded to two decimals (0.8734 → 87.34).
    ///
    /// A presentational derivation only; the stored value stays in `[0, 1]`.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        (f64::from(self.confidence) * 10_000.0).round() / 100.0
    }

    /// The presentation band for this confidence.
    #[must_use]
    pub fn band(&self) -> ConfidenceBand {
        let percent = self.confidence_percent();
        if percent > 75.0 {
            ConfidenceBand::High
        } else if percent >= 50.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// The label with its first letter capitalized, for display.
    #[must_use]
    pub fn display_label(&self) -> String {
        alphabet::capitalize(&self.label)
    }
}

/// A classification service the controller can submit snapshots to.
///
/// The single seam between the submission lifecycle and the outside world;
/// tests substitute in-process implementations.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one encoded drawing.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] on transport failure, a non-success
    /// status, or a malformed response body.
    async fn classify(&self, snapshot: Snapshot) -> SubmitResult<Classification>;
}

/// HTTP classifier speaking the fixed upload contract:
/// multipart POST with one binary image field named `file`.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpClassifier {
    /// Create a classifier for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidUrl`] if the endpoint is malformed and
    /// [`SubmitError::Http`] if the HTTP client fails to build.
    pub fn new(endpoint: &str) -> SubmitResult<Self> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| SubmitError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("glyphpad/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, endpoint })
    }

    /// Create a classifier reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The endpoint submissions are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, snapshot: Snapshot) -> SubmitResult<Classification> {
        let format = snapshot.format();
        let part = Part::bytes(snapshot.into_bytes())
            .file_name(format!("drawing.{}", format.extension()))
            .mime_str(format.mime_type())?;
        let form = Form::new().part("file", part);

        tracing::debug!(endpoint = %self.endpoint, "dispatching classification request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| SubmitError::Protocol(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(confidence: f32) -> Classification {
        Classification {
            label: "alpha".to_string(),
            confidence,
        }
    }

    #[test]
    fn test_confidence_percent_two_decimals() {
        assert!((classification(0.8734).confidence_percent() - 87.34).abs() < 1e-9);
        assert!((classification(0.873_46).confidence_percent() - 87.35).abs() < 1e-9);
        assert!((classification(1.0).confidence_percent() - 100.0).abs() < 1e-9);
        assert!(classification(0.0).confidence_percent().abs() < 1e-9);
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(classification(0.90).band(), ConfidenceBand::High);
        assert_eq!(classification(0.75).band(), ConfidenceBand::Medium);
        assert_eq!(classification(0.50).band(), ConfidenceBand::Medium);
        assert_eq!(classification(0.49).band(), ConfidenceBand::Low);
    }

    #[test]
    fn test_display_label_capitalizes() {
        assert_eq!(classification(0.9).display_label(), "Alpha");
    }

    #[test]
    fn test_response_parsing_uses_wire_field_names() {
        let parsed: Classification =
            serde_json::from_str(r#"{"predicted_letter":"omega","confidence":0.42}"#)
                .expect("parse");
        assert_eq!(parsed.label, "omega");
        assert!((parsed.confidence - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parsing_rejects_missing_fields() {
        let result = serde_json::from_str::<Classification>(r#"{"confidence":0.42}"#);
        assert!(result.is_err());
        let result = serde_json::from_str::<Classification>(r#"{"predicted_letter":"pi"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_endpoint_url() {
        let result = HttpClassifier::new("not a url");
        assert!(matches!(result, Err(SubmitError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_accessor() {
        let classifier = HttpClassifier::new("http://localhost:8000/predict").expect("client");
        assert_eq!(classifier.endpoint().path(), "/predict");
    }
}
