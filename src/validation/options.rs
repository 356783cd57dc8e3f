use crate::{Loose, PollSubmission, ValidationError};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 20;

/// Check the option count and that every option is non-empty text.
///
/// Options are only inspected, never reordered: ballot order is part of
/// the signed digest.
pub fn validate_poll_options(poll: &PollSubmission) -> Result<(), ValidationError> {
    let options = poll.poll_options.as_deref().unwrap_or_default();
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return Err(ValidationError::OptionCountOutOfRange);
    }

    let well_formed = |option: &Loose<String>| matches!(option, Loose::Typed(text) if !text.is_empty());
    if !options.iter().all(well_formed) {
        return Err(ValidationError::MalformedOption);
    }

    Ok(())
}
