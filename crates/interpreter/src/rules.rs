use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::InterpretError;
use crate::fallback::Interpreter;
use crate::input::{DEFAULT_CURRENCY, DEFAULT_MAX_WAIT_MS, Location, Parcel, QuoteInput, QuoteOptions};

static WEIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*kg").expect("weight pattern compiles"));

/// Place keywords and the country they imply, matched on the lowercased utterance.
const PLACES: &[(&str, &str)] = &[
    ("대한민국", "KR"),
    ("한국", "KR"),
    ("서울", "KR"),
    ("korea", "KR"),
    ("seoul", "KR"),
    ("미국", "US"),
    ("샌프란시스코", "US"),
    ("usa", "US"),
    ("san francisco", "US"),
];

/// Every place keyword in one pattern, leftmost match first. Latin keywords
/// only match whole words so "usa" is not found inside "busan" or "thousand".
static PLACE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = PLACES
        .iter()
        .map(|(keyword, _)| {
            if keyword.is_ascii() {
                format!(r"\b{}\b", regex::escape(keyword))
            } else {
                regex::escape(keyword)
            }
        })
        .collect();
    Regex::new(&alternatives.join("|")).expect("place pattern compiles")
});

const PRIORITY_KEYWORDS: &[&str] = &["빠른", "빠르", "급", "express"];

const DEFAULT_FROM: &str = "KR";
const DEFAULT_TO: &str = "US";
const DEFAULT_WEIGHT_KG: f64 = 1.0;

/// Deterministic keyword interpretation. Never fails on a non-empty utterance.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleInterpreter;

impl RuleInterpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, utterance: &str) -> QuoteInput {
        let text = utterance.to_lowercase();

        let weight_kg = WEIGHT
            .captures(&text)
            .and_then(|c| c[1].parse::<f64>().ok())
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_WEIGHT_KG);

        let (from, to) = route(&text);
        let priority = PRIORITY_KEYWORDS.iter().any(|k| text.contains(k));

        QuoteInput {
            from: Location::country(from),
            to: Location::country(to),
            parcel: Parcel::with_weight(weight_kg),
            options: Some(QuoteOptions { priority }),
            currency: DEFAULT_CURRENCY.to_string(),
            max_wait_ms: DEFAULT_MAX_WAIT_MS,
        }
    }
}

/// Origin and destination from the order countries are mentioned in.
/// A single mention other than the default origin is read as the destination.
fn route(text: &str) -> (&'static str, &'static str) {
    let mut mentions: Vec<&'static str> = PLACE
        .find_iter(text)
        .filter_map(|m| {
            PLACES
                .iter()
                .find(|(keyword, _)| *keyword == m.as_str())
                .map(|(_, country)| *country)
        })
        .collect();
    mentions.dedup();

    match mentions.as_slice() {
        [first, second, ..] => (*first, *second),
        [only] if *only == DEFAULT_FROM => (DEFAULT_FROM, DEFAULT_TO),
        [only] => (DEFAULT_FROM, *only),
        [] => (DEFAULT_FROM, DEFAULT_TO),
    }
}

#[async_trait]
impl Interpreter for RuleInterpreter {
    async fn interpret(&self, utterance: &str) -> Result<QuoteInput, InterpretError> {
        if utterance.trim().is_empty() {
            return Err(InterpretError::MissingUtterance);
        }
        Ok(self.parse(utterance))
    }
}
