//! Incoming verification request types.

/// A document attached to a verification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// A file with no name or no contents, as sent by a form with no file chosen.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() || self.bytes.is_empty()
    }
}

/// A request to whitelist an address and, optionally, encrypt and store a document for it.
///
/// The address is carried unparsed; the orchestrator validates it before any adapter runs.
/// A request without a file, or with an empty one, is the distinct "whitelist-only" path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    pub user_address: Option<String>,
    pub file: Option<UploadedFile>,
}

impl VerificationRequest {
    pub fn new(user_address: impl Into<String>) -> Self {
        Self {
            user_address: Some(user_address.into()),
            file: None,
        }
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.file = Some(file);
        self
    }

    /// The attached document, if one was actually supplied.
    pub fn document(&self) -> Option<&UploadedFile> {
        self.file.as_ref().filter(|file| !file.is_empty())
    }
}
