use dashmap::DashMap;
use std::collections::HashMap;

use super::model::{canonical_path, strip_extension, Language, SourceFile, Target};

/// How sure the resolver is about a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// The specifier named exactly one file, by full path or stem.
    Exact,
    /// Suffix or basename matching picked a single plausible file.
    Heuristic,
    /// More than one plausible internal target; degraded to external.
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub target: Target,
    pub confidence: Confidence,
}

impl Resolution {
    fn exact(path: String) -> Self {
        Self {
            target: Target::Internal(path),
            confidence: Confidence::Exact,
        }
    }

    fn heuristic(path: String) -> Self {
        Self {
            target: Target::Internal(path),
            confidence: Confidence::Heuristic,
        }
    }

    fn external(name: impl Into<String>) -> Self {
        Self {
            target: Target::External(name.into()),
            confidence: Confidence::Exact,
        }
    }

    fn ambiguous(name: impl Into<String>) -> Self {
        Self {
            target: Target::External(name.into()),
            confidence: Confidence::Ambiguous,
        }
    }
}

/// Standard-library and framework namespace roots that dotted or pathed
/// specifiers must never resolve into, even when a repo file shadows the
/// name.
const EXTERNAL_NAMESPACES: &[&str] = &[
    // JVM / .NET
    "java", "javax", "jakarta", "kotlin", "scala", "System", "Microsoft", "Windows",
    // Python stdlib staples
    "os", "sys", "re", "json", "typing", "collections", "itertools", "functools", "pathlib",
    "datetime", "logging", "unittest", "asyncio", "subprocess", "math", "abc", "enum",
    "dataclasses",
    // Rust
    "std", "core", "alloc",
];

/// Resolves raw import specifiers to canonical file identities.
///
/// Pure over the file set captured at construction: no disk or network
/// access, so `(source_file, raw_specifier)` pairs are memoized in a
/// concurrent map and repeated calls always return the same target.
pub struct PathResolver {
    /// Extension-stripped canonical path -> canonical paths sharing it.
    by_stem: HashMap<String, Vec<String>>,
    /// Extensionless basename -> canonical paths sharing it.
    by_basename: HashMap<String, Vec<String>>,
    /// Sorted stem list for suffix matching of dotted/pathed specifiers.
    stems: Vec<String>,
    cache: DashMap<(String, String), Resolution>,
}

impl PathResolver {
    pub fn new(files: &[SourceFile]) -> Self {
        let mut by_stem: HashMap<String, Vec<String>> = HashMap::with_capacity(files.len());
        let mut by_basename: HashMap<String, Vec<String>> = HashMap::with_capacity(files.len());

        for file in files {
            let stem = strip_extension(&file.path).to_string();
            let basename = stem.rsplit('/').next().unwrap_or(&stem).to_string();
            by_stem.entry(stem).or_default().push(file.path.clone());
            by_basename
                .entry(basename)
                .or_default()
                .push(file.path.clone());
        }

        let mut stems: Vec<String> = by_stem.keys().cloned().collect();
        stems.sort();

        Self {
            by_stem,
            by_basename,
            stems,
            cache: DashMap::new(),
        }
    }

    /// Resolves `raw_specifier` as written in `source_file`. Deterministic:
    /// the answer is a function of the two arguments and the captured file
    /// set only.
    pub fn resolve(&self, source_file: &str, raw_specifier: &str) -> Resolution {
        let key = (source_file.to_string(), raw_specifier.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let resolution = self.resolve_uncached(source_file, raw_specifier);
        self.cache.insert(key, resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, source_file: &str, raw: &str) -> Resolution {
        let raw = raw.trim();
        if raw.is_empty() {
            return Resolution::external("unknown");
        }

        if raw.starts_with("./") || raw.starts_with("../") || raw == "." || raw == ".." {
            return self.resolve_relative_path(source_file, raw);
        }
        if raw.starts_with('.') {
            return self.resolve_python_relative(source_file, raw);
        }
        if raw.contains("::") {
            return self.resolve_rust_path(source_file, raw);
        }
        // A specifier carrying a known source extension is a file path even
        // without a relative marker (C++ includes, generated JS imports).
        if strip_extension(raw) != raw {
            return self.resolve_file_path(source_file, raw);
        }
        if raw.contains('/') {
            return self.resolve_slashed(raw);
        }
        if raw.contains('.') {
            return self.resolve_dotted(raw);
        }
        self.resolve_bare(raw)
    }

    /// `./foo`, `../lib/bar` style, resolved against the importing file's
    /// directory.
    fn resolve_relative_path(&self, source_file: &str, raw: &str) -> Resolution {
        let base = dirname(source_file);
        let Some(candidate) = join_normalized(base, raw) else {
            // Escaped the workspace root.
            return Resolution::external(last_segment(raw));
        };
        self.lookup_candidate(source_file, &candidate, raw)
    }

    /// Python relative imports: `.mod`, `..pkg.mod`, bare `.`.
    fn resolve_python_relative(&self, source_file: &str, raw: &str) -> Resolution {
        let dots = raw.chars().take_while(|c| *c == '.').count();
        let rest = &raw[dots..];

        let mut dir: Vec<&str> = dirname(source_file)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        for _ in 1..dots {
            if dir.pop().is_none() {
                return Resolution::external(last_segment(raw));
            }
        }

        let mut parts = dir;
        parts.extend(rest.split('.').filter(|s| !s.is_empty()));
        let candidate = parts.join("/");

        if rest.is_empty() {
            // `from . import x` points at the package itself.
            let init = if candidate.is_empty() {
                "__init__".to_string()
            } else {
                format!("{candidate}/__init__")
            };
            return self.lookup_stem(&init, raw).unwrap_or_else(|| {
                Resolution::external(last_segment(source_file))
            });
        }

        self.lookup_candidate(source_file, &candidate, raw)
    }

    /// Rust `use` paths. `crate::`/`self::`/`super::` anchor inside the
    /// workspace; any other root is an external crate.
    fn resolve_rust_path(&self, source_file: &str, raw: &str) -> Resolution {
        let segments: Vec<&str> = raw.split("::").filter(|s| !s.is_empty()).collect();
        let Some((&root, rest)) = segments.split_first() else {
            return Resolution::external("unknown");
        };

        match root {
            "crate" | "self" | "super" => {
                let mut dir: Vec<String> = if root == "crate" {
                    Vec::new()
                } else {
                    dirname(source_file)
                        .split('/')
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                };
                if root == "super" && dir.pop().is_none() {
                    return Resolution::external(last_segment(raw));
                }

                // The trailing segment may be the imported symbol rather
                // than a module; try the full path first, then drop it.
                for take in [rest.len(), rest.len().saturating_sub(1)] {
                    if take == 0 {
                        break;
                    }
                    let mut parts = dir.clone();
                    parts.extend(rest[..take].iter().map(|s| s.to_string()));
                    let module = parts.join("/");
                    for candidate in [module.clone(), format!("{module}/mod")] {
                        if let Some(res) = self.suffix_match(&candidate, raw) {
                            return res;
                        }
                    }
                }
                Resolution::external(last_segment(raw))
            }
            other => Resolution::external(other),
        }
    }

    /// Specifiers that carry an explicit source-file extension.
    fn resolve_file_path(&self, source_file: &str, raw: &str) -> Resolution {
        // Relative to the importing file first, then workspace-root.
        if let Some(candidate) = join_normalized(dirname(source_file), raw) {
            if let Some(res) = self.lookup_stem(strip_extension(&candidate), raw) {
                return res;
            }
        }
        let rooted = canonical_path(raw);
        if let Some(res) = self.lookup_stem(strip_extension(&rooted), raw) {
            return res;
        }
        self.suffix_match(strip_extension(&rooted), raw)
            .unwrap_or_else(|| Resolution::external(first_segment(raw)))
    }

    /// Slash-separated module IDs (Go imports, deep package imports).
    fn resolve_slashed(&self, raw: &str) -> Resolution {
        if EXTERNAL_NAMESPACES.contains(&first_segment(raw)) || raw.contains("github.com") {
            return Resolution::external(first_segment(raw));
        }
        self.suffix_match(raw, raw)
            .unwrap_or_else(|| Resolution::external(first_segment(raw)))
    }

    /// Dotted namespaced specifiers (`a.b.c`) for Java, C# and absolute
    /// Python imports.
    fn resolve_dotted(&self, raw: &str) -> Resolution {
        let top = first_segment(raw);
        if EXTERNAL_NAMESPACES.contains(&top) {
            return Resolution::external(top);
        }

        let segments: Vec<&str> = raw.split('.').filter(|s| !s.is_empty()).collect();
        // Full dotted path, then with the trailing symbol segment dropped.
        for take in [segments.len(), segments.len().saturating_sub(1)] {
            if take == 0 {
                break;
            }
            let candidate = segments[..take].join("/");
            if let Some(res) = self.suffix_match(&candidate, raw) {
                return res;
            }
        }
        Resolution::external(top)
    }

    /// Bare package or module names: a single unambiguous basename match is
    /// internal, everything else is an external package.
    fn resolve_bare(&self, raw: &str) -> Resolution {
        match self.by_basename.get(raw).map(Vec::as_slice) {
            Some([only]) => Resolution::heuristic(only.clone()),
            Some([_, ..]) => Resolution::ambiguous(raw),
            _ => Resolution::external(raw),
        }
    }

    fn lookup_candidate(&self, _source_file: &str, candidate: &str, raw: &str) -> Resolution {
        let stem = strip_extension(candidate);
        if let Some(res) = self.lookup_stem(stem, raw) {
            return res;
        }
        // Directory imports fall back to the language's index module.
        if let Some(res) = self.lookup_stem(&format!("{stem}/index"), raw) {
            return res;
        }
        if let Some(res) = self.lookup_stem(&format!("{stem}/__init__"), raw) {
            return res;
        }
        Resolution::external(last_segment(raw))
    }

    fn lookup_stem(&self, stem: &str, raw: &str) -> Option<Resolution> {
        match self.by_stem.get(stem).map(Vec::as_slice) {
            Some([only]) => Some(Resolution::exact(only.clone())),
            Some(many @ [_, _, ..]) => {
                // Same stem in several languages: an extension written in
                // the specifier disambiguates, otherwise report ambiguity.
                if let Some(ext) = raw.rsplit_once('.').map(|(_, e)| e) {
                    if Language::from_extension(ext).is_some() {
                        if let Some(exact) = many.iter().find(|p| p.ends_with(&format!(".{ext}"))) {
                            return Some(Resolution::exact(exact.clone()));
                        }
                    }
                }
                Some(Resolution::ambiguous(last_segment(raw)))
            }
            _ => None,
        }
    }

    /// Matches `candidate` against the tail of every known stem. One hit is
    /// a heuristic internal target, several are ambiguous.
    fn suffix_match(&self, candidate: &str, raw: &str) -> Option<Resolution> {
        let needle = format!("/{candidate}");
        let mut hits = self
            .stems
            .iter()
            .filter(|stem| stem.as_str() == candidate || stem.ends_with(&needle));

        let first = hits.next()?;
        if hits.next().is_some() {
            return Some(Resolution::ambiguous(last_segment(raw)));
        }
        match self.by_stem.get(first).map(Vec::as_slice) {
            Some([only]) => Some(Resolution::heuristic(only.clone())),
            Some([_, _, ..]) => Some(Resolution::ambiguous(last_segment(raw))),
            _ => None,
        }
    }
}

fn dirname(path: &str) -> &str {
    path.rsplit_once('/').map(|(d, _)| d).unwrap_or("")
}

fn first_segment(specifier: &str) -> &str {
    specifier
        .split(['.', '/', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(specifier)
}

fn last_segment(specifier: &str) -> &str {
    specifier
        .rsplit(['.', '/', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or(specifier)
}

/// Joins a relative specifier onto a base directory and normalizes `.` and
/// `..` segments. Returns `None` when the path escapes the workspace root.
fn join_normalized(base: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}
