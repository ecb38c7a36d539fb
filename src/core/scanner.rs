use anyhow::Result;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;
use walkdir::WalkDir;

use super::model::{canonical_path, InputFile, Language};

/// Directories never worth descending into.
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "__pycache__",
    ".venv",
    "venv",
    "vendor",
];

/// Collaborator-layer file discovery: walks a directory tree and loads the
/// `(path, language, content)` triples the engine consumes. The engine
/// itself never touches the filesystem.
pub struct FileScanner;

impl FileScanner {
    pub fn new() -> Self {
        Self
    }

    /// Discovers and loads every file matching the requested languages,
    /// with paths made workspace-relative to `root`. Unreadable files are
    /// skipped with a warning.
    pub fn scan_directory(&self, root: &Path, languages: &[Language]) -> Result<Vec<InputFile>> {
        let extensions = Self::extension_table(languages);

        let entries: Vec<_> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !(entry.file_type().is_dir()
                    && (SKIP_DIRS.contains(&name.as_ref()) || name.starts_with('.')))
                    || entry.depth() == 0
            })
            .filter_map(|e| e.ok())
            .filter(|entry| entry.path().is_file())
            .collect();

        let mut files: Vec<InputFile> = entries
            .par_iter()
            .filter_map(|entry| {
                let path = entry.path();
                let language = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| extensions.get(ext).copied())?;

                let content = match std::fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(err) => {
                        warn!(path = %path.display(), %err, "skipping unreadable file");
                        return None;
                    }
                };

                let relative = path.strip_prefix(root).unwrap_or(path);
                Some(InputFile::new(
                    canonical_path(&relative.to_string_lossy()),
                    language,
                    content,
                ))
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn extension_table(languages: &[Language]) -> HashMap<&'static str, Language> {
        let mut table = HashMap::with_capacity(languages.len() * 3);
        for &language in languages {
            for &ext in language.extensions() {
                table.insert(ext, language);
            }
        }
        table
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}
