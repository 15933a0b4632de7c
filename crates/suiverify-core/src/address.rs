//! Sui account and object address parsing.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::errors::PipelineError;

/// Number of hex digits in a full-length Sui address.
pub const SUI_ADDRESS_HEX_LEN: usize = 64;

/// A syntactically valid Sui address.
///
/// Keeps the string as submitted (trimmed) so responses echo what the caller sent, and
/// exposes the canonical zero-padded lower-case form for ledger arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuiAddress {
    submitted: String,
    canonical: String,
}

impl SuiAddress {
    /// Parses `0x` followed by 1 to 64 hex digits.
    pub fn parse(address: &str) -> Result<Self, PipelineError> {
        let submitted = address.trim();
        if submitted.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "userAddress is required".to_string(),
            ));
        }
        let digits = submitted.strip_prefix("0x").ok_or_else(|| {
            PipelineError::InvalidRequest(format!("Address {submitted} must start with 0x"))
        })?;
        if digits.is_empty()
            || digits.len() > SUI_ADDRESS_HEX_LEN
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(PipelineError::InvalidRequest(format!(
                "Address {submitted} is not a valid Sui address"
            )));
        }
        let canonical = format!(
            "0x{:0>width$}",
            digits.to_ascii_lowercase(),
            width = SUI_ADDRESS_HEX_LEN
        );
        Ok(Self {
            submitted: submitted.to_string(),
            canonical,
        })
    }

    /// The address exactly as supplied by the caller.
    pub fn as_submitted(&self) -> &str {
        &self.submitted
    }

    /// Full-length lower-case form used when talking to the ledger.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Address bytes (32 bytes).
    pub fn to_bytes(&self) -> Vec<u8> {
        // Unwrap: canonical form is always 64 valid hex digits.
        hex::decode(&self.canonical[2..]).unwrap()
    }
}

impl Display for SuiAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

impl TryFrom<String> for SuiAddress {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SuiAddress> for String {
    fn from(address: SuiAddress) -> Self {
        address.submitted
    }
}
