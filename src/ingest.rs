//! Course-plan ingestion
//!
//! Plain text and markdown are read as-is. Document formats are declined so
//! the user pastes the relevant text instead.

use std::fs;
use std::path::Path;

use crate::error::{StudyError, StudyResult};
use crate::log_debug;

/// Extensions read directly as course-plan text
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "md"];

/// Extensions recognized but not extracted
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "rtf"];

/// Read a course plan from `path`
pub fn load_course_plan(path: &Path) -> StudyResult<String> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    if DOCUMENT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(StudyError::Validation(format!(
            "Automatic text extraction from {} files is not supported. \
             Please copy the relevant text from \"{name}\" and pass it with --plan-text.",
            extension.to_ascii_uppercase()
        )));
    }
    if !TEXT_EXTENSIONS.contains(&extension.as_str()) {
        return Err(StudyError::Validation(format!(
            "Unsupported course plan file \"{name}\". Supported types: .txt, .md"
        )));
    }

    let content = fs::read_to_string(path).map_err(|e| {
        StudyError::Validation(format!("Failed to read course plan \"{name}\": {e}"))
    })?;
    log_debug!("Loaded course plan {} ({} chars)", name, content.chars().count());
    Ok(content)
}
