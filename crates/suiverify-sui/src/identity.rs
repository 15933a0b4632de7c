//! Ed25519 signing identities and their Sui addresses.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey};
use suiverify_core::SuiAddress;
use thiserror::Error;

/// Signature scheme flag for ed25519 keys and signatures.
pub const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for transaction data: scope, version, app id.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

type Blake2b256 = Blake2b<U32>;

/// An error relating to signing keys.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("Failed to decode base64 key: {0}")]
    InvalidEncoding(String),
    #[error("Unsupported key scheme flag {0:#04x}, only ed25519 is supported.")]
    UnsupportedScheme(u8),
    #[error("Expected 33 key bytes (flag and secret), got {0}.")]
    InvalidLength(usize),
    #[error("Failed to decode transaction bytes: {0}")]
    InvalidTransaction(String),
}

/// A key that signs transactions, and the address it controls.
#[derive(Clone)]
pub struct SigningIdentity {
    key: SigningKey,
    address: SuiAddress,
}

impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("address", &self.address.canonical())
            .finish()
    }
}

impl SigningIdentity {
    /// Parses a key in `sui.keystore` format: base64 of `flag || 32-byte secret`.
    pub fn from_keystore(encoded: &str) -> Result<Self, KeyError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|err| KeyError::InvalidEncoding(err.to_string()))?;
        if bytes.len() != 33 {
            return Err(KeyError::InvalidLength(bytes.len()));
        }
        if bytes[0] != ED25519_FLAG {
            return Err(KeyError::UnsupportedScheme(bytes[0]));
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes[1..]);
        Ok(Self::from_secret(secret))
    }

    pub fn from_secret(secret: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&secret);
        let address = address_from_public_key(&key.verifying_key().to_bytes());
        Self { key, address }
    }

    pub fn address(&self) -> &SuiAddress {
        &self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    /// Signs base64 transaction bytes and returns the base64 serialized signature
    /// `flag || signature || public key`.
    pub fn sign_transaction(&self, tx_bytes: &str) -> Result<String, KeyError> {
        let tx_bytes = STANDARD
            .decode(tx_bytes)
            .map_err(|err| KeyError::InvalidTransaction(err.to_string()))?;
        let signature = self.key.sign(&intent_digest(&tx_bytes));
        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(&self.public_key_bytes());
        Ok(STANDARD.encode(serialized))
    }
}

/// Blake2b-256 digest of the transaction intent message.
pub fn intent_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);
    hasher.finalize().into()
}

/// Derives the Sui address of an ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; 32]) -> SuiAddress {
    let mut hasher = Blake2b256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    let digest: [u8; 32] = hasher.finalize().into();
    // Unwrap: 64 hex digits with prefix is always a valid address.
    SuiAddress::parse(&format!("0x{}", hex::encode(digest))).unwrap()
}

/// Roles that sign transactions in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Whitelister,
    Encrypter,
    Uploader,
}

/// The signing identity used for each role.
#[derive(Debug, Clone)]
pub struct RoleIdentities {
    pub whitelister: SigningIdentity,
    pub encrypter: SigningIdentity,
    pub uploader: SigningIdentity,
}

impl RoleIdentities {
    /// One key for every role.
    pub fn single(identity: SigningIdentity) -> Self {
        Self {
            whitelister: identity.clone(),
            encrypter: identity.clone(),
            uploader: identity,
        }
    }

    pub fn for_role(&self, role: Role) -> &SigningIdentity {
        match role {
            Role::Whitelister => &self.whitelister,
            Role::Encrypter => &self.encrypter,
            Role::Uploader => &self.uploader,
        }
    }

    /// Whether all roles share the same address.
    pub fn is_single(&self) -> bool {
        self.whitelister.address() == self.encrypter.address()
            && self.encrypter.address() == self.uploader.address()
    }
}
