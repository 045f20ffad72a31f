use serde::Deserialize;

/// `{"notes": "<markdown>"}`
#[derive(Debug, Clone, Deserialize)]
pub struct NotesPayload {
    pub notes: String,
}
