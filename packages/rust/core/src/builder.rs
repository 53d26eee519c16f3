//! Document builder: walk a directory tree and write it out as Markdown.
//!
//! The walk is top-down and depth-first. Each directory contributes a
//! heading, a bullet per immediate file, and then a content block for each
//! listed file that passes the embedding filter, before its subdirectories
//! are visited.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

use folder2md_markdown::MarkdownWriter;
use folder2md_shared::{FileContent, FilterConfig, Folder2MdError, Result, language_tag};

use crate::filter::{emits_output, should_embed_content, should_list_file, should_skip_directory};
use crate::loader::load_file;

/// Configuration for a single document build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory to traverse.
    pub root: PathBuf,
    /// Markdown file to create (overwritten if present).
    pub output: PathBuf,
    /// Path and extension filters.
    pub filter: FilterConfig,
}

/// Counters collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Directories reached by the walk.
    pub directories_visited: usize,
    /// Directories that produced a heading.
    pub directories_written: usize,
    /// File bullets written.
    pub files_listed: usize,
    /// Content sections written (including placeholders).
    pub files_embedded: usize,
    /// Files rendered with the undecodable placeholder.
    pub undecodable: usize,
    /// Files rendered with a read-error placeholder.
    pub read_failures: usize,
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The written Markdown file.
    pub output: PathBuf,
    /// What was written.
    pub stats: DocumentStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting traversal status.
pub trait ProgressReporter {
    /// Called for every directory the walk reaches, in visiting order.
    fn directory(&self, path: &Path, level: usize);
    /// Called after a file's content section is written.
    fn file_embedded(&self, rel_path: &Path, content: &FileContent);
    /// Called when the build completes.
    fn done(&self, report: &BuildReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn directory(&self, _path: &Path, _level: usize) {}
    fn file_embedded(&self, _rel_path: &Path, _content: &FileContent) {}
    fn done(&self, _report: &BuildReport) {}
}

/// Build the Markdown document described by `config`.
///
/// An invalid root or an output file that cannot be created or written is
/// fatal. Unreadable files degrade to inline placeholders. The output file
/// is not removed when a later write fails.
#[instrument(skip_all, fields(root = %config.root.display(), output = %config.output.display()))]
pub fn build_document(config: &BuildConfig, progress: &dyn ProgressReporter) -> Result<BuildReport> {
    let start = Instant::now();

    validate_root(&config.root)?;

    let file = File::create(&config.output).map_err(|e| Folder2MdError::io(&config.output, e))?;
    // Resolved after creation so the document never tries to embed itself.
    let own_output = std::fs::canonicalize(&config.output).ok();

    info!(extensions = %config.filter.extensions, "building document");

    let mut writer = MarkdownWriter::new(BufWriter::new(file), &config.output);
    let stats = Traversal {
        root: &config.root,
        filter: &config.filter,
        own_output: own_output.as_deref(),
        progress,
        stats: DocumentStats::default(),
    }
    .run(&mut writer)?;
    writer.flush()?;

    let report = BuildReport {
        output: config.output.clone(),
        stats,
        elapsed: start.elapsed(),
    };

    info!(
        directories = report.stats.directories_written,
        files = report.stats.files_embedded,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "document complete"
    );
    progress.done(&report);

    Ok(report)
}

/// Render the document for `root` into an arbitrary writer.
pub fn render_document<W: Write>(
    root: &Path,
    filter: &FilterConfig,
    writer: &mut MarkdownWriter<W>,
    progress: &dyn ProgressReporter,
) -> Result<DocumentStats> {
    validate_root(root)?;
    Traversal {
        root,
        filter,
        own_output: None,
        progress,
        stats: DocumentStats::default(),
    }
    .run(writer)
}

fn validate_root(root: &Path) -> Result<()> {
    let meta = std::fs::metadata(root).map_err(|e| Folder2MdError::io(root, e))?;
    if !meta.is_dir() {
        return Err(Folder2MdError::validation(format!(
            "root '{}' is not a directory",
            root.display()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

struct Traversal<'a> {
    root: &'a Path,
    filter: &'a FilterConfig,
    own_output: Option<&'a Path>,
    progress: &'a dyn ProgressReporter,
    stats: DocumentStats,
}

impl Traversal<'_> {
    fn run<W: Write>(mut self, writer: &mut MarkdownWriter<W>) -> Result<DocumentStats> {
        writer.write_title(self.root)?;

        let filter = self.filter;
        let directories = WalkDir::new(self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.file_type().is_dir() && !should_skip_directory(entry.path(), filter)
            });

        for entry in directories {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(Folder2MdError::walk(self.root, e.to_string()));
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            self.visit_directory(&entry, writer)?;
        }

        Ok(self.stats)
    }

    fn visit_directory<W: Write>(
        &mut self,
        dir: &DirEntry,
        writer: &mut MarkdownWriter<W>,
    ) -> Result<()> {
        let level = dir.depth();
        debug!(path = %dir.path().display(), level, "visiting directory");
        self.progress.directory(dir.path(), level);
        self.stats.directories_visited += 1;

        if !emits_output(dir.path(), self.filter) {
            return Ok(());
        }

        let files: Vec<PathBuf> = list_files(dir.path())
            .into_iter()
            .filter(|path| should_list_file(path, self.filter))
            .collect();

        writer.write_directory_heading(level, &dir.file_name().to_string_lossy())?;
        for path in &files {
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            writer.write_file_bullet(level, &name)?;
        }
        writer.end_listing()?;
        self.stats.directories_written += 1;
        self.stats.files_listed += files.len();

        for path in &files {
            self.embed_file(path, writer)?;
        }

        Ok(())
    }

    fn embed_file<W: Write>(&mut self, path: &Path, writer: &mut MarkdownWriter<W>) -> Result<()> {
        let tag = language_tag(path);
        if !should_embed_content(path, &tag, self.filter) {
            return Ok(());
        }
        if self.is_own_output(path) {
            debug!(path = %path.display(), "not embedding the output document");
            return Ok(());
        }

        let rel_path = path.strip_prefix(self.root).unwrap_or(path);
        let content = load_file(path);
        writer.write_content(rel_path, &tag, &content)?;

        self.stats.files_embedded += 1;
        match &content {
            FileContent::Undecodable => self.stats.undecodable += 1,
            FileContent::ReadFailed(_) => self.stats.read_failures += 1,
            FileContent::Text(_) => {}
        }
        self.progress.file_embedded(rel_path, &content);

        Ok(())
    }

    fn is_own_output(&self, path: &Path) -> bool {
        match self.own_output {
            Some(own) => std::fs::canonicalize(path).is_ok_and(|p| p == own),
            None => false,
        }
    }
}

/// Immediate non-directory children of `dir`, sorted by name.
fn list_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| !entry.path().is_dir())
        .map(DirEntry::into_path)
        .collect()
}
