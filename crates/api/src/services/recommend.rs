//! Rule-based crop recommendation.
//!
//! Scores soil and climate readings against a fixed table of crop growing
//! profiles and returns the best matches. No model inference happens here;
//! the profiles encode the ranges each crop tolerates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of suggestions returned.
const TOP_N: usize = 3;

/// Errors for invalid recommendation input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    /// A reading was outside its physically meaningful range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Soil and climate readings supplied by the farmer.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationInput {
    /// Soil nitrogen (kg/ha).
    pub nitrogen: f64,
    /// Soil phosphorus (kg/ha).
    pub phosphorus: f64,
    /// Soil potassium (kg/ha).
    pub potassium: f64,
    /// Mean temperature (°C).
    pub temperature: f64,
    /// Relative humidity (%).
    pub humidity: f64,
    /// Soil pH.
    pub ph: f64,
    /// Annual rainfall (mm).
    pub rainfall: f64,
}

impl RecommendationInput {
    /// Reject readings that are physically meaningless.
    ///
    /// # Errors
    ///
    /// Returns `RecommendError::InvalidInput` naming the offending field.
    pub fn validate(&self) -> Result<(), RecommendError> {
        let non_negative = [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
            ("rainfall", self.rainfall),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(RecommendError::InvalidInput(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }

        if !self.temperature.is_finite() || !(-20.0..=60.0).contains(&self.temperature) {
            return Err(RecommendError::InvalidInput(
                "temperature must be between -20 and 60".into(),
            ));
        }
        if !self.humidity.is_finite() || !(0.0..=100.0).contains(&self.humidity) {
            return Err(RecommendError::InvalidInput(
                "humidity must be between 0 and 100".into(),
            ));
        }
        if !self.ph.is_finite() || !(0.0..=14.0).contains(&self.ph) {
            return Err(RecommendError::InvalidInput(
                "ph must be between 0 and 14".into(),
            ));
        }

        Ok(())
    }
}

/// One ranked suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct CropSuggestion {
    /// Crop name.
    pub crop: String,
    /// Fit score in `[0, 1]`.
    pub score: f64,
    /// Short note on what limits the fit, if anything does.
    pub notes: Option<String>,
}

/// Tolerated range for one reading.
#[derive(Debug, Clone, Copy)]
struct Range {
    low: f64,
    high: f64,
}

impl Range {
    const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// 1.0 inside the range, decaying linearly to 0 at one range-width
    /// outside either end.
    fn fit(self, value: f64) -> f64 {
        let width = (self.high - self.low).max(1.0);
        let distance = if value < self.low {
            self.low - value
        } else if value > self.high {
            value - self.high
        } else {
            return 1.0;
        };
        (1.0 - distance / width).max(0.0)
    }

    const fn contains(self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Growing profile for one crop.
#[derive(Debug, Clone, Copy)]
struct CropProfile {
    name: &'static str,
    nitrogen: Range,
    phosphorus: Range,
    potassium: Range,
    temperature: Range,
    humidity: Range,
    ph: Range,
    rainfall: Range,
}

/// Tolerated ranges per crop, derived from published agronomy tables.
static CROP_PROFILES: &[CropProfile] = &[
    CropProfile {
        name: "rice",
        nitrogen: Range::new(60.0, 99.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(35.0, 45.0),
        temperature: Range::new(20.0, 27.0),
        humidity: Range::new(80.0, 85.0),
        ph: Range::new(5.0, 7.5),
        rainfall: Range::new(180.0, 300.0),
    },
    CropProfile {
        name: "maize",
        nitrogen: Range::new(60.0, 100.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(18.0, 27.0),
        humidity: Range::new(55.0, 75.0),
        ph: Range::new(5.5, 7.0),
        rainfall: Range::new(60.0, 110.0),
    },
    CropProfile {
        name: "chickpea",
        nitrogen: Range::new(20.0, 60.0),
        phosphorus: Range::new(55.0, 80.0),
        potassium: Range::new(75.0, 85.0),
        temperature: Range::new(17.0, 21.0),
        humidity: Range::new(14.0, 20.0),
        ph: Range::new(6.0, 8.0),
        rainfall: Range::new(65.0, 95.0),
    },
    CropProfile {
        name: "kidney beans",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(55.0, 80.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(15.0, 25.0),
        humidity: Range::new(18.0, 25.0),
        ph: Range::new(5.5, 6.0),
        rainfall: Range::new(60.0, 150.0),
    },
    CropProfile {
        name: "pigeon peas",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(55.0, 80.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(18.0, 37.0),
        humidity: Range::new(30.0, 70.0),
        ph: Range::new(4.5, 7.5),
        rainfall: Range::new(90.0, 200.0),
    },
    CropProfile {
        name: "moth beans",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(24.0, 32.0),
        humidity: Range::new(40.0, 65.0),
        ph: Range::new(3.5, 9.5),
        rainfall: Range::new(30.0, 75.0),
    },
    CropProfile {
        name: "mung bean",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(27.0, 30.0),
        humidity: Range::new(80.0, 90.0),
        ph: Range::new(6.2, 7.2),
        rainfall: Range::new(36.0, 60.0),
    },
    CropProfile {
        name: "black gram",
        nitrogen: Range::new(20.0, 60.0),
        phosphorus: Range::new(55.0, 80.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(25.0, 35.0),
        humidity: Range::new(60.0, 70.0),
        ph: Range::new(6.5, 7.8),
        rainfall: Range::new(60.0, 75.0),
    },
    CropProfile {
        name: "lentil",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(55.0, 80.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(18.0, 30.0),
        humidity: Range::new(60.0, 70.0),
        ph: Range::new(6.0, 7.5),
        rainfall: Range::new(35.0, 55.0),
    },
    CropProfile {
        name: "pomegranate",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(5.0, 30.0),
        potassium: Range::new(35.0, 45.0),
        temperature: Range::new(18.0, 25.0),
        humidity: Range::new(85.0, 95.0),
        ph: Range::new(5.5, 7.2),
        rainfall: Range::new(100.0, 120.0),
    },
    CropProfile {
        name: "banana",
        nitrogen: Range::new(80.0, 120.0),
        phosphorus: Range::new(70.0, 95.0),
        potassium: Range::new(45.0, 55.0),
        temperature: Range::new(25.0, 30.0),
        humidity: Range::new(75.0, 85.0),
        ph: Range::new(5.5, 6.5),
        rainfall: Range::new(90.0, 120.0),
    },
    CropProfile {
        name: "mango",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(15.0, 40.0),
        potassium: Range::new(25.0, 35.0),
        temperature: Range::new(27.0, 36.0),
        humidity: Range::new(45.0, 55.0),
        ph: Range::new(4.5, 7.0),
        rainfall: Range::new(85.0, 100.0),
    },
    CropProfile {
        name: "grapes",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(120.0, 145.0),
        potassium: Range::new(195.0, 205.0),
        temperature: Range::new(8.0, 42.0),
        humidity: Range::new(80.0, 84.0),
        ph: Range::new(5.5, 6.5),
        rainfall: Range::new(65.0, 75.0),
    },
    CropProfile {
        name: "watermelon",
        nitrogen: Range::new(80.0, 120.0),
        phosphorus: Range::new(5.0, 30.0),
        potassium: Range::new(45.0, 55.0),
        temperature: Range::new(24.0, 27.0),
        humidity: Range::new(80.0, 90.0),
        ph: Range::new(6.0, 7.0),
        rainfall: Range::new(40.0, 60.0),
    },
    CropProfile {
        name: "muskmelon",
        nitrogen: Range::new(80.0, 120.0),
        phosphorus: Range::new(5.0, 30.0),
        potassium: Range::new(45.0, 55.0),
        temperature: Range::new(27.0, 30.0),
        humidity: Range::new(90.0, 95.0),
        ph: Range::new(6.0, 6.8),
        rainfall: Range::new(20.0, 30.0),
    },
    CropProfile {
        name: "apple",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(120.0, 145.0),
        potassium: Range::new(195.0, 205.0),
        temperature: Range::new(21.0, 24.0),
        humidity: Range::new(90.0, 95.0),
        ph: Range::new(5.5, 6.5),
        rainfall: Range::new(100.0, 125.0),
    },
    CropProfile {
        name: "orange",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(5.0, 30.0),
        potassium: Range::new(5.0, 15.0),
        temperature: Range::new(10.0, 35.0),
        humidity: Range::new(90.0, 95.0),
        ph: Range::new(6.0, 7.5),
        rainfall: Range::new(100.0, 120.0),
    },
    CropProfile {
        name: "papaya",
        nitrogen: Range::new(31.0, 70.0),
        phosphorus: Range::new(46.0, 70.0),
        potassium: Range::new(45.0, 55.0),
        temperature: Range::new(23.0, 44.0),
        humidity: Range::new(90.0, 95.0),
        ph: Range::new(6.5, 7.0),
        rainfall: Range::new(40.0, 250.0),
    },
    CropProfile {
        name: "coconut",
        nitrogen: Range::new(0.0, 40.0),
        phosphorus: Range::new(5.0, 30.0),
        potassium: Range::new(25.0, 35.0),
        temperature: Range::new(25.0, 30.0),
        humidity: Range::new(90.0, 100.0),
        ph: Range::new(5.5, 6.5),
        rainfall: Range::new(130.0, 230.0),
    },
    CropProfile {
        name: "cotton",
        nitrogen: Range::new(100.0, 140.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(15.0, 25.0),
        temperature: Range::new(22.0, 26.0),
        humidity: Range::new(75.0, 85.0),
        ph: Range::new(5.8, 8.0),
        rainfall: Range::new(60.0, 100.0),
    },
    CropProfile {
        name: "jute",
        nitrogen: Range::new(60.0, 100.0),
        phosphorus: Range::new(35.0, 60.0),
        potassium: Range::new(35.0, 45.0),
        temperature: Range::new(23.0, 27.0),
        humidity: Range::new(70.0, 90.0),
        ph: Range::new(6.0, 7.5),
        rainfall: Range::new(150.0, 200.0),
    },
    CropProfile {
        name: "coffee",
        nitrogen: Range::new(80.0, 120.0),
        phosphorus: Range::new(15.0, 40.0),
        potassium: Range::new(25.0, 35.0),
        temperature: Range::new(23.0, 28.0),
        humidity: Range::new(50.0, 70.0),
        ph: Range::new(6.0, 7.5),
        rainfall: Range::new(110.0, 200.0),
    },
];

/// Rank crops against the readings and return the top matches.
///
/// # Errors
///
/// Returns `RecommendError::InvalidInput` if any reading is out of range.
pub fn recommend(input: &RecommendationInput) -> Result<Vec<CropSuggestion>, RecommendError> {
    input.validate()?;

    let mut scored: Vec<CropSuggestion> = CROP_PROFILES
        .iter()
        .map(|profile| score_profile(profile, input))
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(TOP_N);
    Ok(scored)
}

fn score_profile(profile: &CropProfile, input: &RecommendationInput) -> CropSuggestion {
    let checks = [
        ("nitrogen", profile.nitrogen, input.nitrogen),
        ("phosphorus", profile.phosphorus, input.phosphorus),
        ("potassium", profile.potassium, input.potassium),
        ("temperature", profile.temperature, input.temperature),
        ("humidity", profile.humidity, input.humidity),
        ("soil pH", profile.ph, input.ph),
        ("rainfall", profile.rainfall, input.rainfall),
    ];

    let mut total = 0.0;
    let mut off_range: Vec<&str> = Vec::new();
    for (name, range, value) in checks {
        total += range.fit(value);
        if !range.contains(value) {
            off_range.push(name);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let score = total / checks.len() as f64;

    let notes = if off_range.is_empty() {
        None
    } else {
        Some(format!("outside preferred range: {}", off_range.join(", ")))
    };

    CropSuggestion {
        crop: profile.name.to_owned(),
        score,
        notes,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rice_conditions() -> RecommendationInput {
        RecommendationInput {
            nitrogen: 85.0,
            phosphorus: 45.0,
            potassium: 40.0,
            temperature: 24.0,
            humidity: 82.0,
            ph: 6.2,
            rainfall: 220.0,
        }
    }

    #[test]
    fn test_rice_conditions_rank_rice_first() {
        let suggestions = recommend(&rice_conditions()).unwrap();
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].crop, "rice");
        assert!((suggestions[0].score - 1.0).abs() < f64::EPSILON);
        assert!(suggestions[0].notes.is_none());
    }

    #[test]
    fn test_scores_are_sorted_and_bounded() {
        let input = RecommendationInput {
            nitrogen: 50.0,
            phosphorus: 50.0,
            potassium: 50.0,
            temperature: 25.0,
            humidity: 60.0,
            ph: 6.5,
            rainfall: 100.0,
        };
        let suggestions = recommend(&input).unwrap();
        for pair in suggestions.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for s in &suggestions {
            assert!((0.0..=1.0).contains(&s.score));
        }
    }

    #[test]
    fn test_off_range_readings_are_noted() {
        let mut input = rice_conditions();
        input.rainfall = 20.0;
        let suggestions = recommend(&input).unwrap();
        let rice = suggestions.iter().find(|s| s.crop == "rice");
        if let Some(rice) = rice {
            assert!(rice.notes.as_deref().unwrap().contains("rainfall"));
            assert!(rice.score < 1.0);
        }
    }

    #[test]
    fn test_validation_rejects_bad_ph() {
        let mut input = rice_conditions();
        input.ph = 15.0;
        assert!(matches!(
            recommend(&input),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validation_rejects_negative_nitrogen() {
        let mut input = rice_conditions();
        input.nitrogen = -1.0;
        assert!(matches!(
            recommend(&input),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validation_rejects_humidity_over_100() {
        let mut input = rice_conditions();
        input.humidity = 101.0;
        assert!(matches!(
            recommend(&input),
            Err(RecommendError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_range_fit_decays_outside() {
        let range = Range::new(10.0, 20.0);
        assert!((range.fit(15.0) - 1.0).abs() < f64::EPSILON);
        assert!(range.fit(25.0) < 1.0);
        assert!(range.fit(25.0) > 0.0);
        assert!((range.fit(35.0) - 0.0).abs() < f64::EPSILON);
    }
}
