use crate::{Loose, PollSubmission, ValidationError};
use ethers::types::Address;
use ethers::utils::to_checksum;

/// Whether `candidate` is a well-formed Ethereum address.
///
/// Accepts `0x` followed by 40 hex digits. Single-case hex is taken as is;
/// mixed case must carry a valid EIP-55 checksum.
pub fn is_valid_address(candidate: &str) -> bool {
    let Some(hex) = candidate.strip_prefix("0x") else {
        return false;
    };
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }

    match hex.parse::<Address>() {
        Ok(address) => to_checksum(&address, None) == candidate,
        Err(_) => false,
    }
}

pub fn validate_account(poll: &PollSubmission) -> Result<(), ValidationError> {
    match poll.polltaker_account.as_ref().and_then(Loose::as_str) {
        Some(account) if is_valid_address(account) => Ok(()),
        _ => Err(ValidationError::MalformedAddress),
    }
}
