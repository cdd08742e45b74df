//! Raw upload as received from a client.

/// An uploaded file awaiting evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Display name, usually the original file name or path.
    pub name: String,
    /// Content type declared by the uploader. Logged, never trusted.
    pub content_type: Option<String>,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload without a declared content type.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Sets the declared content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}
