//! Plant health assessment client.
//!
//! Wraps the hosted plant identification API: the handler sends one
//! base64-encoded photo, the provider returns disease suggestions with
//! probabilities, and the response is flattened into a [`DiseaseReport`].

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PlantHealthConfig;
use crate::models::{DiseaseFinding, DiseaseReport};

/// Errors that can occur when calling the plant health provider.
#[derive(Debug, Error)]
pub enum PlantHealthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be constructed.
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Serialize)]
struct AssessmentRequest<'a> {
    images: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
}

// Provider response shape. Fields the mapping does not need are omitted;
// serde ignores them.

#[derive(Debug, Deserialize)]
struct AssessmentResponse {
    result: Option<AssessmentResult>,
}

#[derive(Debug, Deserialize)]
struct AssessmentResult {
    is_healthy: Option<BinaryJudgement>,
    disease: Option<DiseaseSuggestions>,
    crop: Option<CropSuggestions>,
}

#[derive(Debug, Deserialize)]
struct BinaryJudgement {
    binary: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DiseaseSuggestions {
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct CropSuggestions {
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    name: String,
    probability: Option<f64>,
    details: Option<SuggestionDetails>,
}

#[derive(Debug, Deserialize)]
struct SuggestionDetails {
    treatment: Option<Treatment>,
}

#[derive(Debug, Deserialize)]
struct Treatment {
    #[serde(default)]
    biological: Vec<String>,
    #[serde(default)]
    chemical: Vec<String>,
    #[serde(default)]
    prevention: Vec<String>,
}

/// Plant health assessment client.
#[derive(Clone)]
pub struct PlantHealthClient {
    client: reqwest::Client,
    base_url: String,
}

impl PlantHealthClient {
    /// Create a new plant health client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &PlantHealthConfig) -> Result<Self, PlantHealthError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "Api-Key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .map_err(|e| PlantHealthError::Config(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Run a health assessment on one base64-encoded photo.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn assess(
        &self,
        image_base64: &str,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<DiseaseReport, PlantHealthError> {
        let url = format!(
            "{}/health_assessment?details=treatment&language=en",
            self.base_url
        );

        let body = AssessmentRequest {
            images: [image_base64],
            latitude,
            longitude,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlantHealthError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let assessment: AssessmentResponse = response
            .json()
            .await
            .map_err(|e| PlantHealthError::Parse(e.to_string()))?;

        Ok(map_report(assessment))
    }
}

/// Flatten the provider response into the shape the frontend consumes.
fn map_report(response: AssessmentResponse) -> DiseaseReport {
    let Some(result) = response.result else {
        return DiseaseReport {
            plant_name: None,
            is_healthy: false,
            diseases: Vec::new(),
        };
    };

    let plant_name = result
        .crop
        .and_then(|c| c.suggestions.into_iter().next())
        .map(|s| s.name);

    let is_healthy = result
        .is_healthy
        .and_then(|h| h.binary)
        .unwrap_or_default();

    let mut diseases: Vec<DiseaseFinding> = result
        .disease
        .map(|d| d.suggestions)
        .unwrap_or_default()
        .into_iter()
        .map(|s| DiseaseFinding {
            name: s.name,
            probability: s.probability.unwrap_or_default(),
            treatment: s.details.and_then(|d| d.treatment).and_then(format_treatment),
        })
        .collect();

    diseases.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    DiseaseReport {
        plant_name,
        is_healthy,
        diseases,
    }
}

/// Join the provider's treatment lists into one readable string.
fn format_treatment(treatment: Treatment) -> Option<String> {
    let mut parts = Vec::new();
    if !treatment.biological.is_empty() {
        parts.push(format!("Biological: {}", treatment.biological.join("; ")));
    }
    if !treatment.chemical.is_empty() {
        parts.push(format!("Chemical: {}", treatment.chemical.join("; ")));
    }
    if !treatment.prevention.is_empty() {
        parts.push(format!("Prevention: {}", treatment.prevention.join("; ")));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_report_full_response() {
        let json = r#"{
            "result": {
                "is_healthy": {"binary": false, "probability": 0.12},
                "crop": {"suggestions": [{"name": "Solanum lycopersicum", "probability": 0.97}]},
                "disease": {"suggestions": [
                    {"name": "early blight", "probability": 0.41,
                     "details": {"treatment": {"biological": ["remove infected leaves"],
                                               "chemical": ["copper fungicide"],
                                               "prevention": ["rotate crops"]}}},
                    {"name": "late blight", "probability": 0.83}
                ]}
            }
        }"#;

        let response: AssessmentResponse = serde_json::from_str(json).unwrap();
        let report = map_report(response);

        assert_eq!(report.plant_name.as_deref(), Some("Solanum lycopersicum"));
        assert!(!report.is_healthy);
        assert_eq!(report.diseases.len(), 2);
        // Sorted by probability descending
        assert_eq!(report.diseases[0].name, "late blight");
        assert!(report.diseases[0].treatment.is_none());
        let treatment = report.diseases[1].treatment.as_deref().unwrap();
        assert!(treatment.contains("copper fungicide"));
        assert!(treatment.contains("rotate crops"));
    }

    #[test]
    fn test_map_report_healthy_plant() {
        let json = r#"{"result": {"is_healthy": {"binary": true}}}"#;
        let response: AssessmentResponse = serde_json::from_str(json).unwrap();
        let report = map_report(response);

        assert!(report.is_healthy);
        assert!(report.diseases.is_empty());
        assert!(report.plant_name.is_none());
    }

    #[test]
    fn test_map_report_empty_response() {
        let response: AssessmentResponse = serde_json::from_str("{}").unwrap();
        let report = map_report(response);

        assert!(!report.is_healthy);
        assert!(report.diseases.is_empty());
    }
}
