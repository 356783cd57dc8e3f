//! Attestation check
//!
//! A polltaker signs the poll with `eth_signTypedData` using the `Poll`
//! schema below. The server rebuilds the same typed data from the submitted
//! fields, recovers the signer and compares it with the claimed account.

use crate::{number_text, EventId, Loose, PollSubmission, ValidationError};
use ethers::types::transaction::eip712::{Eip712, Eip712Error, TypedData};
use ethers::types::{Address, Signature, SignatureError, H256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

/// Length of a hex-encoded 65 byte `r || s || v` signature.
pub const SIGNATURE_HEX_LEN: usize = 130;

/// One member of an EIP-712 struct type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// Named EIP-712 struct type with its ordered members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedSchema {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

/// The struct type clients sign.
///
/// Member order, names and types determine the type hash. Changing any of
/// them invalidates every signature clients produce.
pub const POLL_SCHEMA: TypedSchema = TypedSchema {
    name: "Poll",
    fields: &[
        FieldDescriptor { name: "title", kind: "string" },
        FieldDescriptor { name: "polltaker_account", kind: "address" },
        FieldDescriptor { name: "description", kind: "string" },
        FieldDescriptor { name: "valid_event_ids", kind: "uint256[]" },
        FieldDescriptor { name: "poll_options", kind: "string[]" },
        FieldDescriptor { name: "end_date", kind: "string" },
    ],
};

/// The signed portion of a submission: every field except the attestation.
///
/// `end_date` is declared as `string` in [`POLL_SCHEMA`], so it is carried as
/// its decimal text rather than as a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollDigest {
    pub title: String,
    pub polltaker_account: String,
    pub description: String,
    pub valid_event_ids: Vec<EventId>,
    pub poll_options: Vec<String>,
    pub end_date: String,
}

impl PollDigest {
    /// Project the signed fields out of `poll`.
    ///
    /// Returns `None` when a signed field is missing or not text where text is
    /// expected; earlier stages rule that out for the full pipeline.
    pub fn from_submission(poll: &PollSubmission) -> Option<Self> {
        let text = |field: &Option<Loose<String>>| field.as_ref()?.typed().cloned();

        let valid_event_ids = poll
            .valid_event_ids
            .as_ref()?
            .iter()
            .map(|id| id.typed().map(EventId::canonical))
            .collect::<Option<Vec<_>>>()?;

        let poll_options = poll
            .poll_options
            .as_ref()?
            .iter()
            .map(|option| option.typed().cloned())
            .collect::<Option<Vec<_>>>()?;

        let end_date = match poll.end_date.as_ref()? {
            Loose::Typed(secs) => number_text(secs),
            Loose::Malformed(Value::String(text)) => text.clone(),
            Loose::Malformed(other) => other.to_string(),
        };

        Some(Self {
            title: text(&poll.title)?,
            polltaker_account: text(&poll.polltaker_account)?,
            description: text(&poll.description)?,
            valid_event_ids,
            poll_options,
            end_date,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("signature could not be decoded or recovered: {0}")]
    Signature(#[from] SignatureError),
    #[error("typed data could not be assembled: {0}")]
    TypedData(#[from] serde_json::Error),
    #[error("typed data could not be hashed: {0}")]
    Encoding(#[from] Eip712Error),
}

/// Capability that turns a typed-data signature back into its signer.
pub trait SignerRecovery: Send + Sync {
    fn recover_signer(
        &self,
        signature: &str,
        schema: &TypedSchema,
        digest: &PollDigest,
    ) -> Result<Address, RecoveryError>;
}

/// EIP-712 domain the poll is signed under
///
/// Unset members are left out of the domain type entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
}

/// [`SignerRecovery`] backed by ethers' EIP-712 encoder and secp256k1 recovery
#[derive(Debug, Clone, Default)]
pub struct Eip712Recovery {
    domain: SigningDomain,
}

impl Eip712Recovery {
    pub fn new(domain: SigningDomain) -> Self {
        Self { domain }
    }

    /// Typed data for `digest` under `schema`, exactly as a client signs it.
    pub fn typed_data(&self, schema: &TypedSchema, digest: &PollDigest) -> Result<TypedData, RecoveryError> {
        let typed = json!({
            "domain": self.domain,
            "types": { schema.name: schema.fields },
            "primaryType": schema.name,
            "message": digest,
        });
        Ok(serde_json::from_value(typed)?)
    }
}

impl SignerRecovery for Eip712Recovery {
    fn recover_signer(
        &self,
        signature: &str,
        schema: &TypedSchema,
        digest: &PollDigest,
    ) -> Result<Address, RecoveryError> {
        let signature = Signature::from_str(signature)?;
        let hash = self.typed_data(schema, digest)?.encode_eip712()?;
        Ok(signature.recover(H256::from(hash))?)
    }
}

/// Check that the attestation was produced by the claimed polltaker.
///
/// A signature of the wrong length is rejected before recovery is attempted.
/// The recovered signer and the claimed account are compared as 20 byte
/// addresses, so the account's letter case does not matter.
pub fn validate_signature(poll: &PollSubmission, recovery: &dyn SignerRecovery) -> Result<(), ValidationError> {
    let signature = poll.attestation.as_ref().and_then(Loose::as_str).unwrap_or_default();
    if signature.len() != SIGNATURE_HEX_LEN {
        return Err(ValidationError::MalformedSignature);
    }

    let digest = PollDigest::from_submission(poll).ok_or(ValidationError::SignatureMismatch)?;
    let claimed = Address::from_str(&digest.polltaker_account).map_err(|_| ValidationError::SignatureMismatch)?;

    match recovery.recover_signer(signature, &POLL_SCHEMA, &digest) {
        Ok(recovered) if recovered == claimed => Ok(()),
        _ => Err(ValidationError::SignatureMismatch),
    }
}
