//! Generated transformation programs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One complete program returned by the generator for a single attempt.
///
/// Programs are never merged or diffed: every attempt stores a full
/// replacement.
///
/// Deserialization takes only the text and recomputes the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredProgram")]
pub struct GeneratedProgram {
    text: String,
    sha256: String,
}

impl GeneratedProgram {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let sha256 = hex::encode(Sha256::digest(text.as_bytes()));
        Self { text, sha256 }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hex SHA-256 of the program text, used to correlate log lines.
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// First 12 hex characters of the fingerprint.
    pub fn short_id(&self) -> &str {
        &self.sha256[..12]
    }

    /// Size of the program in UTF-8 bytes.
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[derive(Deserialize)]
struct StoredProgram {
    text: String,
}

impl From<StoredProgram> for GeneratedProgram {
    fn from(stored: StoredProgram) -> Self {
        Self::new(stored.text)
    }
}
