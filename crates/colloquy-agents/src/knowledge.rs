//! Per-agent knowledge: documents, the store, and the directory loader.
//!
//! A store is built once when its agent is created. Sources are read in a
//! fixed order: the inline knowledge text first (one document), then every
//! recognized file found by a recursive scan of the knowledge directory.
//!
//! Directory scans never fail the caller. A file that cannot be read turns
//! into a placeholder document whose content is a visible failure notice.
//! A missing directory yields no documents at all.

use std::path::{Path, PathBuf};

use colloquy_types::AgentConfig;
use tracing::{debug, warn};

use crate::config::AgentSettings;
use crate::error::KnowledgeError;
use crate::retrieval;

/// One unit of retrievable knowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Plain-text content.
    pub content: String,
    /// Provenance: originating file name, or a load-failure marker.
    pub label: Option<String>,
}

impl Document {
    /// A document without provenance (inline knowledge).
    pub fn inline(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            label: None,
        }
    }

    /// A document read from the named file.
    pub fn from_file(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            label: Some(label.into()),
        }
    }

    /// A placeholder standing in for a source that failed to load.
    pub fn load_failure(error: &KnowledgeError) -> Self {
        Self {
            content: format!("[knowledge load failed: {error}]"),
            label: Some(String::from("load failed")),
        }
    }

    /// Text shown to the model: a `[file: name]` header for file documents.
    pub fn render(&self) -> String {
        match &self.label {
            Some(label) => format!("[file: {label}]\n{}", self.content),
            None => self.content.clone(),
        }
    }
}

/// Recursively loads plain-text files from a directory.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    extensions: Vec<String>,
}

impl DirectoryLoader {
    /// Create a loader recognizing the given extensions.
    ///
    /// Extensions are matched case-insensitively; a leading dot is ignored.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    /// Whether the path has a recognized extension.
    pub fn recognizes(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|known| *known == ext)
            })
    }

    /// Load every recognized file under `dir`.
    ///
    /// Files are visited in lexicographic path order within each directory,
    /// so the result is stable across runs. Whitespace-only files are
    /// skipped.
    pub fn load(&self, dir: &Path) -> Vec<Document> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "knowledge directory missing, nothing loaded");
            return Vec::new();
        }

        let mut documents = Vec::new();
        self.scan(dir, &mut documents);
        debug!(
            dir = %dir.display(),
            documents = documents.len(),
            "knowledge directory loaded"
        );
        documents
    }

    fn scan(&self, dir: &Path, documents: &mut Vec<Document>) {
        let mut entries = match list_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "knowledge directory unreadable");
                documents.push(Document::load_failure(&e));
                return;
            }
        };
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (path, is_dir) in entries {
            if is_dir {
                self.scan(&path, documents);
            } else if self.recognizes(&path) {
                match read_document(&path) {
                    Ok(Some(document)) => documents.push(document),
                    Ok(None) => debug!(path = %path.display(), "empty knowledge file skipped"),
                    Err(e) => {
                        warn!(error = %e, "knowledge file unreadable");
                        documents.push(Document::load_failure(&e));
                    }
                }
            }
        }
    }
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new(AgentSettings::default().extensions)
    }
}

/// List a directory as `(path, is_dir)` pairs. Symlinked directories are
/// not descended into.
fn list_dir(dir: &Path) -> Result<Vec<(PathBuf, bool)>, KnowledgeError> {
    let read_dir_error = |source| KnowledgeError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
        entries.push((entry.path(), is_dir));
    }
    Ok(entries)
}

/// Read one file as lossy UTF-8. Returns `None` for whitespace-only files.
fn read_document(path: &Path) -> Result<Option<Document>, KnowledgeError> {
    let bytes = std::fs::read(path).map_err(|source| KnowledgeError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let label = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(Some(Document::from_file(label, text)))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if let Some(rest) = trimmed.strip_prefix('~')
        && (rest.is_empty() || rest.starts_with('/'))
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest.trim_start_matches('/'));
    }
    PathBuf::from(trimmed)
}

/// An agent's private, immutable document list.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    documents: Vec<Document>,
}

impl KnowledgeStore {
    /// Build from explicit documents.
    pub const fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build from an agent's config: inline text first, then the directory.
    pub fn from_config(config: &AgentConfig, loader: &DirectoryLoader) -> Self {
        let mut documents = Vec::new();
        if !config.knowledge.trim().is_empty() {
            documents.push(Document::inline(config.knowledge.clone()));
        }
        if let Some(dir) = config.knowledge_directory() {
            documents.extend(loader.load(&expand_home(dir)));
        }
        Self { documents }
    }

    /// All documents in load order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Up to `top_k` documents relevant to `query`.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<&Document> {
        retrieval::select(&self.documents, query, top_k)
    }
}
