use serde::{Deserialize, Serialize};

use crate::error::InterpretError;

pub const DEFAULT_CURRENCY: &str = "KRW";
pub const DEFAULT_MAX_WAIT_MS: u64 = 1200;
pub const DEFAULT_LENGTH_CM: f64 = 30.0;
pub const DEFAULT_WIDTH_CM: f64 = 20.0;
pub const DEFAULT_HEIGHT_CM: f64 = 15.0;

/// Structured `QUOTE` input. `from`, `to` and `parcel` are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteInput {
    pub from: Location,
    pub to: Location,
    pub parcel: Parcel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<QuoteOptions>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub max_wait_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// ISO 3166-1 alpha-2.
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal: Option<String>,
}

impl Location {
    pub fn country(code: impl Into<String>) -> Self {
        Self {
            country: code.into(),
            postal: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub weight_kg: f64,
    #[serde(default = "default_length")]
    pub l_cm: f64,
    #[serde(default = "default_width")]
    pub w_cm: f64,
    #[serde(default = "default_height")]
    pub h_cm: f64,
}

impl Parcel {
    /// A parcel of `weight_kg` with the default box dimensions.
    pub fn with_weight(weight_kg: f64) -> Self {
        Self {
            weight_kg,
            l_cm: DEFAULT_LENGTH_CM,
            w_cm: DEFAULT_WIDTH_CM,
            h_cm: DEFAULT_HEIGHT_CM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteOptions {
    #[serde(default)]
    pub priority: bool,
}

fn default_length() -> f64 {
    DEFAULT_LENGTH_CM
}

fn default_width() -> f64 {
    DEFAULT_WIDTH_CM
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT_CM
}

impl QuoteInput {
    /// Fill defaults for unset fields and check the result is usable.
    pub fn normalize(mut self) -> Result<Self, InterpretError> {
        self.from.country = self.from.country.trim().to_uppercase();
        self.to.country = self.to.country.trim().to_uppercase();
        if self.currency.trim().is_empty() {
            self.currency = DEFAULT_CURRENCY.to_string();
        }
        if self.max_wait_ms == 0 {
            self.max_wait_ms = DEFAULT_MAX_WAIT_MS;
        }

        if self.from.country.is_empty() || self.to.country.is_empty() {
            return Err(InterpretError::Incomplete("country is required".into()));
        }
        if !(self.parcel.weight_kg.is_finite() && self.parcel.weight_kg > 0.0) {
            return Err(InterpretError::Incomplete(format!(
                "weight_kg must be positive, got {}",
                self.parcel.weight_kg
            )));
        }
        Ok(self)
    }
}
