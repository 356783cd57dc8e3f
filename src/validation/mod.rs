//! Poll Validation Module
//!
//! This module decides whether a poll submission is admissible.
//! Checks run in a fixed order and stop at the first failure:
//! required fields, end date, account format, options, qualifying events
//! and finally the EIP-712 attestation.

mod address;
mod end_date;
mod events;
mod fields;
mod options;
mod signature;
mod validator;


pub use address::{is_valid_address, validate_account};
pub use end_date::{validate_end_date, MIN_LEAD_TIME_SECS, SECONDS_CEILING};
pub use events::validate_events;
pub use fields::validate_fields;
pub use options::{validate_poll_options, MAX_OPTIONS, MIN_OPTIONS};
pub use signature::{
    validate_signature, Eip712Recovery, FieldDescriptor, PollDigest, RecoveryError,
    SignerRecovery, SigningDomain, TypedSchema, POLL_SCHEMA, SIGNATURE_HEX_LEN,
};
pub use validator::{PollValidator, ValidationContext};
