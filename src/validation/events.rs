use crate::{EventId, EventRecord, Loose, PollSubmission, ValidationError};
use std::collections::HashSet;

/// Check that every qualifying event id is in the allow-listed `events`.
///
/// Numeric and textual ids never match each other: `7` and `"7"` are
/// different events. Ids that are neither numbers nor strings match nothing.
pub fn validate_events(poll: &PollSubmission, events: &[EventRecord]) -> Result<(), ValidationError> {
    let known: HashSet<EventId> = events.iter().map(|event| event.id.canonical()).collect();

    let event_ids = poll.valid_event_ids.as_deref().unwrap_or_default();
    let unknown = event_ids.iter().find(|id| match id {
        Loose::Typed(id) => !known.contains(&id.canonical()),
        Loose::Malformed(_) => true,
    });

    match unknown {
        Some(Loose::Typed(id)) => Err(ValidationError::UnknownEventReference(id.to_string())),
        Some(Loose::Malformed(value)) => Err(ValidationError::UnknownEventReference(value.to_string())),
        None => Ok(()),
    }
}
