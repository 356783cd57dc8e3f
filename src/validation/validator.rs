use super::{
    validate_account, validate_end_date, validate_events, validate_fields, validate_poll_options,
    validate_signature, Eip712Recovery, SignerRecovery,
};
use crate::{EventRecord, PollSubmission, ValidationError, ValidationResult};
use chrono::Utc;

/// Everything a stage may consult besides the submission itself
pub struct ValidationContext<'a> {
    /// Current time in seconds since the Unix epoch
    pub now: i64,
    /// Allow-listed events
    pub events: &'a [EventRecord],
    pub recovery: &'a dyn SignerRecovery,
}

type Stage = fn(&PollSubmission, &ValidationContext<'_>) -> Result<(), ValidationError>;

/// Validation stages in execution order.
///
/// Later stages rely on what earlier ones established (for instance the
/// options stage assumes the structural stage saw `poll_options`).
const STAGES: [(&str, Stage); 6] = [
    ("fields", |poll, _| validate_fields(poll)),
    ("end_date", |poll, ctx| validate_end_date(poll, ctx.now)),
    ("account", |poll, _| validate_account(poll)),
    ("options", |poll, _| validate_poll_options(poll)),
    ("events", |poll, ctx| validate_events(poll, ctx.events)),
    ("signature", |poll, ctx| validate_signature(poll, ctx.recovery)),
];

/// Poll submission validator
///
/// Runs every stage in order and stops at the first failure. Validation is a
/// pure function of the submission, the events and the clock; it keeps no
/// state between calls.
pub struct PollValidator<R = Eip712Recovery> {
    recovery: R,
}

impl<R: SignerRecovery> PollValidator<R> {
    pub fn new(recovery: R) -> Self {
        Self { recovery }
    }

    /// Validate a poll submission against the current wall clock
    pub fn validate_create(&self, poll: &PollSubmission, events: &[EventRecord]) -> ValidationResult {
        self.validate_create_at(poll, events, Utc::now().timestamp())
    }

    /// Validate a poll submission as of `now` (seconds since the Unix epoch)
    pub fn validate_create_at(&self, poll: &PollSubmission, events: &[EventRecord], now: i64) -> ValidationResult {
        self.check(poll, events, now).into()
    }

    /// Like [`validate_create_at`](Self::validate_create_at), keeping the typed error
    pub fn check(&self, poll: &PollSubmission, events: &[EventRecord], now: i64) -> Result<(), ValidationError> {
        // The stage name only matters for logging, so it is dropped here
        match self.failing_stage(poll, events, now) {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }

    /// Name of the first failing stage together with its error
    pub fn failing_stage(
        &self,
        poll: &PollSubmission,
        events: &[EventRecord],
        now: i64,
    ) -> Option<(&'static str, ValidationError)> {
        // Step 1: Gather what the stages consult besides the submission
        let ctx = ValidationContext {
            now,
            events,
            recovery: &self.recovery,
        };
        // Step 2: Run the stages in order; `find_map` stops at the first error
        STAGES
            .iter()
            .find_map(|&(name, stage)| stage(poll, &ctx).err().map(|error| (name, error)))
    }
}
