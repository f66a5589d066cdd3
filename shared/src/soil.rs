//! Soil health scoring

use serde::{Deserialize, Serialize};

use crate::models::SoilParams;

/// Optimal nutrient levels, kg/ha
pub const OPTIMAL_NITROGEN: f64 = 60.0;
pub const OPTIMAL_PHOSPHORUS: f64 = 40.0;
pub const OPTIMAL_POTASSIUM: f64 = 40.0;

/// Recommendation shown when every parameter scores well
pub const HEALTHY_SOIL_MESSAGE: &str = "Your soil is in excellent condition for most crops!";

/// Overall soil rating
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SoilRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SoilRating {
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => SoilRating::Excellent,
            60..=79 => SoilRating::Good,
            40..=59 => SoilRating::Fair,
            _ => SoilRating::Poor,
        }
    }
}

impl std::fmt::Display for SoilRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilRating::Excellent => write!(f, "Excellent"),
            SoilRating::Good => write!(f, "Good"),
            SoilRating::Fair => write!(f, "Fair"),
            SoilRating::Poor => write!(f, "Poor"),
        }
    }
}

/// Per-parameter and overall soil scores (0-100)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SoilHealth {
    pub ph_score: u32,
    pub nitrogen_score: u32,
    pub phosphorus_score: u32,
    pub potassium_score: u32,
    pub overall_score: u32,
    pub rating: SoilRating,
    pub recommendations: Vec<String>,
}

/// pH score: 100 at 6.0-7.0, stepping down as the soil leaves that band
pub fn ph_score(ph: f64) -> u32 {
    if (6.0..=7.0).contains(&ph) {
        100
    } else if (5.5..=7.5).contains(&ph) {
        75
    } else if (5.0..=8.0).contains(&ph) {
        50
    } else {
        25
    }
}

/// Nutrient score by closeness of `value` to `optimal`
pub fn nutrient_score(value: f64, optimal: f64) -> u32 {
    let ratio = value / optimal;
    if (0.8..=1.2).contains(&ratio) {
        100
    } else if (0.5..=1.5).contains(&ratio) {
        75
    } else if (0.3..=2.0).contains(&ratio) {
        50
    } else {
        25
    }
}

/// Score the soil and suggest corrections
pub fn assess(soil: &SoilParams) -> SoilHealth {
    let ph = ph_score(soil.ph);
    let n = nutrient_score(soil.n, OPTIMAL_NITROGEN);
    let p = nutrient_score(soil.p, OPTIMAL_PHOSPHORUS);
    let k = nutrient_score(soil.k, OPTIMAL_POTASSIUM);

    let weighted = ph as f64 * 0.3 + n as f64 * 0.25 + p as f64 * 0.225 + k as f64 * 0.225;
    let overall = weighted.round() as u32;

    let mut recommendations = Vec::new();
    if ph < 75 {
        recommendations.push(if soil.ph < 6.0 {
            "Add lime to increase pH"
        } else {
            "Add sulfur to decrease pH"
        });
    }
    if n < 75 {
        recommendations.push(if soil.n < 40.0 {
            "Apply nitrogen fertilizer"
        } else {
            "Reduce nitrogen application"
        });
    }
    if p < 75 {
        recommendations.push(if soil.p < 30.0 {
            "Apply phosphorus fertilizer"
        } else {
            "Reduce phosphorus"
        });
    }
    if k < 75 {
        recommendations.push(if soil.k < 30.0 {
            "Apply potassium fertilizer"
        } else {
            "Reduce potassium"
        });
    }
    if recommendations.is_empty() {
        recommendations.push(HEALTHY_SOIL_MESSAGE);
    }

    SoilHealth {
        ph_score: ph,
        nitrogen_score: n,
        phosphorus_score: p,
        potassium_score: k,
        overall_score: overall,
        rating: SoilRating::from_score(overall),
        recommendations: recommendations.into_iter().map(String::from).collect(),
    }
}

/// Form label for a pH reading
pub fn ph_status(ph: f64) -> &'static str {
    if ph < 5.5 {
        "Too Acidic"
    } else if ph > 7.5 {
        "Too Alkaline"
    } else if (6.0..=7.0).contains(&ph) {
        "Optimal"
    } else {
        "Acceptable"
    }
}

/// Soil nutrients with form status ranges
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Nutrient {
    #[serde(rename = "N")]
    Nitrogen,
    #[serde(rename = "P")]
    Phosphorus,
    #[serde(rename = "K")]
    Potassium,
}

impl Nutrient {
    /// (low, high) bounds in kg/ha
    fn range(&self) -> (f64, f64) {
        match self {
            Nutrient::Nitrogen => (30.0, 120.0),
            Nutrient::Phosphorus | Nutrient::Potassium => (20.0, 80.0),
        }
    }
}

/// Form label for a nutrient reading: Low, High or Good
pub fn nutrient_status(nutrient: Nutrient, value: f64) -> &'static str {
    let (low, high) = nutrient.range();
    if value < low {
        "Low"
    } else if value > high {
        "High"
    } else {
        "Good"
    }
}
