//! Loading file bytes for embedding.

use std::path::Path;

use tracing::debug;

use folder2md_shared::FileContent;

/// Read a file as UTF-8 text.
///
/// Never fails: undecodable bytes and I/O errors are returned as
/// [`FileContent`] variants for the renderer to turn into placeholders.
pub fn load_file(path: &Path) -> FileContent {
    match std::fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(e) => {
                debug!(path = %path.display(), error = %e.utf8_error(), "file is not valid UTF-8");
                FileContent::Undecodable
            }
        },
        Err(e) => {
            debug!(path = %path.display(), error = %e, "failed to read file");
            FileContent::ReadFailed(e.to_string())
        }
    }
}
