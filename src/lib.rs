//! # depscan
//!
//! Cross-language dependency analysis for mixed codebases.
//!
//! depscan extracts declarations and import references from source files,
//! resolves raw import specifiers against the analyzed file set, and builds
//! a dependency graph that downstream analyzers score for complexity,
//! dead exports, and component structure.
//!
//! ## Pipeline
//!
//! - **Extraction**: per-language extractors (tree-sitter for TypeScript,
//!   JavaScript, Python and Rust; pattern scanning for Java, C#, Go and C++)
//! - **Resolution**: import specifiers matched against the analyzed file
//!   set, with confidence tracking and ambiguity diagnostics
//! - **Analysis**: complexity scoring, orphaned-export detection and
//!   directory-based component grouping over the frozen graph
//!
//! ## Supported Languages
//!
//! TypeScript, JavaScript, Python, Rust, Java, C#, Go, C++

pub mod analysis;
pub mod core;
pub mod extract;
pub mod formatters;
