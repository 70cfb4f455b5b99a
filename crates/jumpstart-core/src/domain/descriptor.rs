use std::fmt;
use std::path::PathBuf;

use crate::domain::error::DomainError;

/// Default prefix marking a descriptor as relative to the workspace root.
pub const DEFAULT_REPO_PREFIX: &str = "repo:";

/// Default directory under the workspace root that holds named templates.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// A template reference as written on the command line or in `extends`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    raw: String,
    location: TemplateLocation,
}

/// How a descriptor locates its directory.
///
/// Descriptors are classified in a fixed order:
/// 1. `<repo prefix><path>`: relative to the workspace root
/// 2. anything containing a path separator: a literal directory
/// 3. otherwise: a named template under `<workspace root>/<templates dir>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateLocation {
    Repository(PathBuf),
    Path(PathBuf),
    Named(String),
}

impl TemplateDescriptor {
    /// Classify `raw` using the default `repo:` prefix.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        Self::parse_with_prefix(raw, DEFAULT_REPO_PREFIX)
    }

    pub fn parse_with_prefix(raw: &str, repo_prefix: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let invalid = |reason: String| DomainError::InvalidDescriptor {
            descriptor: raw.to_string(),
            reason,
        };

        if trimmed.is_empty() {
            return Err(invalid("descriptor is empty".into()));
        }

        let location = if let Some(rest) = trimmed
            .strip_prefix(repo_prefix)
            .filter(|_| !repo_prefix.is_empty())
        {
            let rest = rest.trim_start_matches('/');
            if rest.is_empty() {
                return Err(invalid(format!("nothing follows the {repo_prefix} prefix")));
            }
            TemplateLocation::Repository(PathBuf::from(rest))
        } else if trimmed.contains('/') || trimmed.contains(std::path::MAIN_SEPARATOR) {
            TemplateLocation::Path(PathBuf::from(trimmed))
        } else if trimmed == "." || trimmed == ".." {
            return Err(invalid("use ./ or ../ to reference a directory".into()));
        } else {
            TemplateLocation::Named(trimmed.to_string())
        };

        Ok(Self {
            raw: trimmed.to_string(),
            location,
        })
    }

    pub fn location(&self) -> &TemplateLocation {
        &self.location
    }
}

impl fmt::Display for TemplateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
