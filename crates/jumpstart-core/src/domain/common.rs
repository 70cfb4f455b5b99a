use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// A filesystem path guaranteed to be **relative** and to stay inside
/// whatever root it is later joined to.
///
/// Copy steps name paths inside the template source and inside the
/// destination; neither may be absolute or climb above its root with `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Validate `raw` for the manifest field `field` (`copy.from` / `copy.to`).
    ///
    /// The stored path is lexically normalized: `./files/../src` becomes `src`,
    /// and `.` alone becomes the empty path (the root itself).
    pub fn try_new(field: &'static str, raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let invalid = |reason: &str| DomainError::InvalidPathOperand {
            field,
            operand: raw.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let path = Path::new(trimmed);
        if path.is_absolute() || path.has_root() {
            return Err(invalid("path must be relative"));
        }

        let mut normalized = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => normalized.push(part),
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(invalid("path escapes its root"));
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("path must be relative"));
                }
            }
        }

        Ok(Self(normalized))
    }

    /// A single, already-valid path segment.
    pub(crate) fn child(segment: &str) -> Self {
        Self(PathBuf::from(segment))
    }

    /// Join onto an absolute root.
    pub fn resolve_under(&self, root: &Path) -> PathBuf {
        if self.0.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(&self.0)
        }
    }

    /// Borrow as a `Path`.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.as_os_str().is_empty() {
            f.write_str(".")
        } else {
            write!(f, "{}", self.0.display())
        }
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped, matching how shells resolve `/..`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against `base` and normalize it.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&base.join(path))
    }
}

/// Fail loudly when a path that must be absolute is not.
pub fn ensure_absolute(field: &'static str, path: &Path) -> Result<(), DomainError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(DomainError::InvalidPathOperand {
            field,
            operand: path.display().to_string(),
            reason: "path was not canonicalized to an absolute path".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---------------------------------------------------------------------
    // RelativePath
    // ---------------------------------------------------------------------

    #[test]
    fn relative_path_accepts_relative() {
        let p = RelativePath::try_new("copy.from", "./files").unwrap();
        assert_eq!(p.as_path(), Path::new("files"));
    }

    #[test]
    fn relative_path_accepts_bare_names() {
        let p = RelativePath::try_new("copy.from", "files/src").unwrap();
        assert_eq!(p.as_path(), Path::new("files/src"));
    }

    #[test]
    fn relative_path_dot_is_root() {
        let p = RelativePath::try_new("copy.to", ".").unwrap();
        assert_eq!(p.resolve_under(Path::new("/dest")), PathBuf::from("/dest"));
        assert_eq!(p.to_string(), ".");
    }

    #[test]
    fn try_new_rejects_absolute() {
        let err = RelativePath::try_new("copy.from", "/etc/passwd").unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidPathOperand { field: "copy.from", .. }
        ));
    }

    #[test]
    fn try_new_rejects_escape() {
        assert!(RelativePath::try_new("copy.from", "../sibling").is_err());
        assert!(RelativePath::try_new("copy.from", "./a/../../b").is_err());
    }

    #[test]
    fn try_new_allows_inner_parent_dirs() {
        let p = RelativePath::try_new("copy.to", "./a/b/../c").unwrap();
        assert_eq!(p.as_path(), Path::new("a/c"));
    }

    #[test]
    fn try_new_rejects_empty() {
        assert!(RelativePath::try_new("copy.from", "  ").is_err());
    }

    // ---------------------------------------------------------------------
    // Absolute helpers
    // ---------------------------------------------------------------------

    #[test]
    fn absolutize_joins_and_normalizes() {
        assert_eq!(
            absolutize(Path::new("../out/./dest"), Path::new("/work/repo")),
            PathBuf::from("/work/out/dest")
        );
        assert_eq!(
            absolutize(Path::new("/tmp/x/.."), Path::new("/ignored")),
            PathBuf::from("/tmp")
        );
    }

    #[test]
    fn ensure_absolute_rejects_relative() {
        assert!(ensure_absolute("copy.to", Path::new("relative/dir")).is_err());
        assert!(ensure_absolute("copy.to", Path::new("/abs/dir")).is_ok());
    }
}
