//! Photo storage implementations - local disk and in-memory.

mod local;
mod memory;

pub use local::{LocalPhotoStorage, PhotoStorageConfig};
pub use memory::InMemoryPhotoStorage;

use std::path::Path;

/// Reduce an uploaded file name to a safe final path component.
pub(crate) fn sanitize_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        return "photo".to_string();
    }
    truncate_keeping_extension(cleaned)
}

/// Longest sanitized name kept. Stored files get a 37 byte `<uuid>_` prefix
/// and must stay within the 255 byte file name limit.
pub(crate) const MAX_FILE_NAME_LEN: usize = 200;

const MAX_EXTENSION_LEN: usize = 16;

// `name` is ASCII here, so byte offsets are char boundaries.
fn truncate_keeping_extension(mut name: String) -> String {
    if name.len() <= MAX_FILE_NAME_LEN {
        return name;
    }

    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_LEN => {
            let extension = name.split_off(dot);
            name.truncate(MAX_FILE_NAME_LEN - extension.len());
            name + &extension
        }
        _ => {
            name.truncate(MAX_FILE_NAME_LEN);
            name
        }
    }
}
