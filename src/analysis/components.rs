use std::collections::BTreeMap;

use crate::core::model::{ComponentGroup, SourceFile};

/// Keyword patterns matched against a group's paths, highest priority
/// first; the first hit picks the description.
const DESCRIPTION_KEYWORDS: &[(&str, &str)] = &[
    ("api", "API surface and request handlers"),
    ("models", "Data models and persistence types"),
    ("services", "Business logic and service layer"),
    ("utils", "Shared utilities and helpers"),
    ("auth", "Authentication and authorization"),
    ("test", "Tests and fixtures"),
    ("ui", "User interface components"),
    ("config", "Configuration and settings"),
];

const RESIDUAL_GROUP: &str = "workspace";

/// Partitions files into advisory groups from path structure alone.
///
/// Best-effort presentation aid; never an input to scoring or dead-code
/// detection.
pub struct ComponentMapper;

impl ComponentMapper {
    /// Groups sorted by name, member files sorted within each group.
    pub fn group(files: &[SourceFile]) -> Vec<ComponentGroup> {
        let mut members: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for file in files {
            let group = Self::boundary_for(&file.path)
                .unwrap_or_else(|| RESIDUAL_GROUP.to_string());
            members.entry(group).or_default().push(file.path.clone());
        }

        members
            .into_iter()
            .map(|(name, mut files)| {
                files.sort();
                let description = Self::describe(&name, &files);
                ComponentGroup {
                    name,
                    description,
                    files,
                }
            })
            .collect()
    }

    /// Looks for a project-boundary marker one or two path segments deep:
    /// a dotted directory name suggesting a sub-project, or the
    /// conventional `src/<name>/` pattern.
    fn boundary_for(path: &str) -> Option<String> {
        let segments: Vec<&str> = path.split('/').collect();
        // The final segment is the file itself, never a boundary.
        let dirs = &segments[..segments.len().saturating_sub(1)];

        for segment in dirs.iter().take(2) {
            if segment.contains('.') {
                return Some((*segment).to_string());
            }
        }
        if dirs.len() >= 2 && dirs[0] == "src" {
            return Some(dirs[1].to_string());
        }
        None
    }

    fn describe(name: &str, files: &[String]) -> String {
        if name == RESIDUAL_GROUP {
            return "Files outside any detected component boundary".to_string();
        }
        for (keyword, description) in DESCRIPTION_KEYWORDS {
            let in_name = name.to_ascii_lowercase().contains(keyword);
            let in_files = files
                .iter()
                .any(|f| f.to_ascii_lowercase().contains(keyword));
            if in_name || in_files {
                return (*description).to_string();
            }
        }
        format!("Source files under {name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Language;

    fn file(path: &str) -> SourceFile {
        SourceFile {
            path: path.to_string(),
            language: Language::Python,
            size: 0,
        }
    }

    #[test]
    fn groups_by_src_subdirectory() {
        let groups = ComponentMapper::group(&[
            file("src/auth/login.py"),
            file("src/auth/session.py"),
            file("src/billing/invoice.py"),
            file("README.py"),
        ]);
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["auth", "billing", "workspace"]);
        assert_eq!(groups[0].files.len(), 2);
    }

    #[test]
    fn dotted_directory_is_a_boundary() {
        let groups = ComponentMapper::group(&[file("acme.billing/src/invoice.py")]);
        assert_eq!(groups[0].name, "acme.billing");
    }

    #[test]
    fn description_uses_first_keyword_match() {
        let groups = ComponentMapper::group(&[file("src/auth/login.py")]);
        assert_eq!(groups[0].description, "Authentication and authorization");
    }
}
