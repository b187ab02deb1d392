use serde::{Deserialize, Serialize};

/// A prompt/response pair, both the wire shape returned to callers and the
/// shape persisted in the prompt log.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// Prompt exactly as the caller submitted it.
    pub prompt: String,
    /// Generated output with surrounding whitespace removed.
    pub text: String,
}
