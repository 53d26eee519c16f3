//! Markdown rendering for folder2md documents.
//!
//! [`MarkdownWriter`] appends the document piece by piece to any [`Write`]
//! sink: the title, one heading per directory with its file bullets, and a
//! fenced content block per embedded file. Nothing written is read back.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::trace;

use folder2md_shared::{FileContent, Folder2MdError, Result};

/// Spaces of indentation per nesting level.
pub const INDENT_WIDTH: usize = 4;

/// Placeholder written for files whose bytes are not valid UTF-8.
pub const UNDECODABLE_PLACEHOLDER: &str =
    "[Binary file or unsupported encoding - content not displayed]";

/// Language tag used for placeholder blocks.
const PLACEHOLDER_TAG: &str = "txt";

/// Indentation prefix for a directory at `level` below the root.
pub fn indent(level: usize) -> String {
    " ".repeat(INDENT_WIDTH * level)
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Sequential Markdown writer over an output sink.
pub struct MarkdownWriter<W: Write> {
    sink: W,
    /// Output location, reported in I/O errors.
    target: PathBuf,
}

impl<W: Write> MarkdownWriter<W> {
    /// Wrap `sink`; `target` names the destination in error messages.
    pub fn new(sink: W, target: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            target: target.into(),
        }
    }

    /// `# Folder Structure of <root>` followed by a blank line.
    pub fn write_title(&mut self, root: &Path) -> Result<()> {
        self.emit(&format!("# Folder Structure of {}\n\n", root.display()))
    }

    /// Directory heading indented by `level`.
    pub fn write_directory_heading(&mut self, level: usize, name: &str) -> Result<()> {
        self.emit(&format!("{}## {name}\n", indent(level)))
    }

    /// One bullet under the current directory heading.
    pub fn write_file_bullet(&mut self, level: usize, name: &str) -> Result<()> {
        self.emit(&format!("{} - {name}\n", indent(level)))
    }

    /// Blank line closing a directory listing.
    pub fn end_listing(&mut self) -> Result<()> {
        self.emit("\n")
    }

    /// Content section for one file.
    ///
    /// Text is embedded verbatim under `tag`; failures render as a `txt`
    /// block with a placeholder so the document stays complete.
    pub fn write_content(&mut self, rel_path: &Path, tag: &str, content: &FileContent) -> Result<()> {
        trace!(path = %rel_path.display(), tag, "writing content block");
        self.emit(&format!("### {} Content:\n\n", rel_path.display()))?;

        match content {
            FileContent::Text(text) => self.emit(&fenced(tag, text)),
            FileContent::Undecodable => self.emit(&fenced(PLACEHOLDER_TAG, UNDECODABLE_PLACEHOLDER)),
            FileContent::ReadFailed(reason) => self.emit(&fenced(
                PLACEHOLDER_TAG,
                &format!("[Error reading file: {reason}]"),
            )),
        }
    }

    /// Flush buffered output to the sink.
    pub fn flush(&mut self) -> Result<()> {
        self.sink
            .flush()
            .map_err(|e| Folder2MdError::io(&self.target, e))
    }

    /// Consume the writer and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.sink
            .write_all(text.as_bytes())
            .map_err(|e| Folder2MdError::io(&self.target, e))
    }
}

/// A fenced block: the body is followed by a newline before the closing fence.
fn fenced(tag: &str, body: &str) -> String {
    format!("```{tag}\n{body}\n```\n\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
