use crate::{Loose, PollSubmission, ValidationError};
use serde_json::{Number, Value};

/// Truthiness of a submitted value: present and not empty, zero or false.
pub(crate) trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Number {
    fn is_truthy(&self) -> bool {
        self.as_f64().is_some_and(|n| n != 0.0)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.is_truthy(),
            Value::String(s) => s.is_truthy(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

impl<T: Truthy> Truthy for Loose<T> {
    fn is_truthy(&self) -> bool {
        match self {
            Loose::Typed(value) => value.is_truthy(),
            Loose::Malformed(value) => value.is_truthy(),
        }
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

type Check = fn(&PollSubmission) -> bool;

const REQUIRED_FIELDS: [(&str, Check); 7] = [
    ("title", |poll| poll.title.is_truthy()),
    ("polltaker_account", |poll| poll.polltaker_account.is_truthy()),
    ("description", |poll| poll.description.is_truthy()),
    ("end_date", |poll| poll.end_date.is_truthy()),
    ("valid_event_ids", |poll| poll.valid_event_ids.is_truthy()),
    ("poll_options", |poll| poll.poll_options.is_truthy()),
    ("attestation", |poll| poll.attestation.is_truthy()),
];

/// Check that every required field is present and non-empty.
///
/// The error names the field for diagnostics, but its message stays generic.
pub fn validate_fields(poll: &PollSubmission) -> Result<(), ValidationError> {
    match REQUIRED_FIELDS.iter().find(|(_, present)| !present(poll)) {
        Some(&(field, _)) => Err(ValidationError::MissingField { field }),
        None => Ok(()),
    }
}
