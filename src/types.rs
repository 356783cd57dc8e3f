use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// A field value as the client sent it.
///
/// Deserializes into `Typed` when the JSON has the expected shape and keeps
/// anything else as `Malformed`, so the validation stages can report the
/// problem instead of the request failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loose<T> {
    Typed(T),
    Malformed(Value),
}

impl<T> Loose<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Loose::Typed(value) => Some(value),
            Loose::Malformed(_) => None,
        }
    }
}

impl Loose<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.typed().map(String::as_str)
    }
}

/// Text form of a JSON number: integral values print without a fraction
/// (`1900000000.0` becomes `"1900000000"`), matching what web clients sign.
pub fn number_text(number: &Number) -> String {
    if let Some(n) = number.as_u64() {
        n.to_string()
    } else if let Some(n) = number.as_i64() {
        n.to_string()
    } else {
        // f64's Display never adds a trailing ".0"
        number.as_f64().map(|n| n.to_string()).unwrap_or_else(|| number.to_string())
    }
}

/// Identifier of an external (POAP) event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Number(Number),
    Text(String),
}

impl EventId {
    pub fn number(id: u64) -> Self {
        EventId::Number(id.into())
    }

    /// Same id with integral floats folded into integers, so `7.0` and `7`
    /// compare equal.
    pub fn canonical(&self) -> EventId {
        match self {
            EventId::Number(n) if n.is_f64() => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 => {
                    EventId::Number(Number::from(f as i64))
                }
                _ => self.clone(),
            },
            _ => self.clone(),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Number(id) => f.write_str(&number_text(id)),
            EventId::Text(id) => f.write_str(id),
        }
    }
}

/// Poll proposal submitted by a polltaker
///
/// Every field is optional on the wire and scalar values of the wrong JSON
/// type are kept; presence and shape are checked by the validator stages,
/// not by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSubmission {
    pub title: Option<Loose<String>>,
    pub polltaker_account: Option<Loose<String>>,
    pub description: Option<Loose<String>>,
    /// Seconds since the Unix epoch; any JSON number
    pub end_date: Option<Loose<Number>>,
    pub valid_event_ids: Option<Vec<Loose<EventId>>>,
    pub poll_options: Option<Vec<Loose<String>>>,
    /// Hex-encoded 65 byte signature over the poll's EIP-712 digest
    pub attestation: Option<Loose<String>>,
}

/// Allow-listed event record
///
/// Only `id` takes part in validation; the rest of the record is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

impl EventRecord {
    pub fn new(id: EventId) -> Self {
        Self {
            id,
            details: serde_json::Map::new(),
        }
    }
}

/// Reasons a poll submission is rejected
///
/// The display strings are returned to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required poll data fields")]
    MissingField { field: &'static str },
    #[error("Poll end date should be a number in seconds since Unix epoch")]
    MalformedDate,
    #[error("Poll end date must be at least 1 day in the future")]
    DateTooSoon,
    #[error("Ethereum address is improperly formed")]
    MalformedAddress,
    #[error("Poll must have between 2 and 20 options")]
    OptionCountOutOfRange,
    #[error("Poll Option contents are missing or malformed")]
    MalformedOption,
    /// Carries the offending id as the client wrote it
    #[error("Invalid ID in qualifying events {0}")]
    UnknownEventReference(String),
    #[error("Improperly formed signature")]
    MalformedSignature,
    #[error("Signature does not match the data submitted")]
    SignatureMismatch,
}

/// Outcome of validating a poll, as reported to callers
///
/// `is_valid` is true exactly when `error_message` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(error: &ValidationError) -> Self {
        Self {
            is_valid: false,
            error_message: Some(error.to_string()),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => ValidationResult::valid(),
            Err(error) => ValidationResult::invalid(&error),
        }
    }
}
