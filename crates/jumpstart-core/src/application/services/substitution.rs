//! Variable substitution over a materialized project tree.
//!
//! Replacement is literal: every occurrence of a binding's token is replaced
//! by its value, bindings applied in order. Files under a `.git` directory
//! are never touched and files that are not UTF-8 text are left as-is.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    application::{
        events::{ScaffoldEvent, UnresolvedPlaceholder},
        ports::{Filesystem, Reporter},
    },
    domain::VariableBinding,
    error::JumpstartResult,
};

/// Name of the VCS metadata directory excluded from substitution.
pub const VCS_DIR: &str = ".git";

/// What a substitution pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    /// Files left untouched because they are not UTF-8 text.
    pub skipped_files: Vec<PathBuf>,
    /// Placeholders still present after the pass.
    pub leftovers: Vec<UnresolvedPlaceholder>,
}

pub struct VariableSubstitutor {
    filesystem: Arc<dyn Filesystem>,
    reporter: Arc<dyn Reporter>,
}

impl VariableSubstitutor {
    pub fn new(filesystem: Arc<dyn Filesystem>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            filesystem,
            reporter,
        }
    }

    /// Rewrite every token of `bindings` under `target`, then look for any
    /// remaining `marker` occurrences.
    ///
    /// Not transactional: an error partway leaves earlier files rewritten.
    #[instrument(skip_all, fields(target = %target.display(), bindings = bindings.len()))]
    pub fn substitute(
        &self,
        target: &Path,
        bindings: &[VariableBinding],
        marker: &str,
    ) -> JumpstartResult<SubstitutionReport> {
        let replacements = self.announce(bindings);
        let files = self.candidate_files(target)?;

        let mut report = SubstitutionReport {
            files_scanned: files.len(),
            ..SubstitutionReport::default()
        };

        for path in &files {
            let bytes = self.filesystem.read_file(path)?;
            let Ok(original) = String::from_utf8(bytes) else {
                self.skip(path, &mut report);
                continue;
            };

            let rewritten = replacements
                .iter()
                .fold(original.clone(), |text, (token, value)| text.replace(token, value));

            if rewritten != original {
                self.filesystem.write_file(path, rewritten.as_bytes())?;
                report.files_rewritten += 1;
                debug!(path = %path.display(), "Rewrote file");
            }
        }

        self.reporter.report(&ScaffoldEvent::SubstitutionCompleted {
            files_scanned: report.files_scanned,
            files_rewritten: report.files_rewritten,
        });

        report.leftovers = self.scan_leftovers(target, marker)?;
        if !report.leftovers.is_empty() {
            self.reporter.report(&ScaffoldEvent::UnsubstitutedVariables {
                occurrences: report.leftovers.clone(),
            });
        }

        Ok(report)
    }

    /// Every line under `target` that still contains `marker`.
    pub fn scan_leftovers(
        &self,
        target: &Path,
        marker: &str,
    ) -> JumpstartResult<Vec<UnresolvedPlaceholder>> {
        let mut leftovers = Vec::new();
        for path in self.candidate_files(target)? {
            let bytes = self.filesystem.read_file(&path)?;
            let Ok(text) = String::from_utf8(bytes) else {
                continue;
            };
            for (number, line) in text.lines().enumerate() {
                if line.contains(marker) {
                    leftovers.push(UnresolvedPlaceholder {
                        path: path.clone(),
                        line: number + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }
        Ok(leftovers)
    }

    /// Report each binding and keep the ones with a value.
    fn announce<'a>(&self, bindings: &'a [VariableBinding]) -> Vec<(&'a str, &'a str)> {
        let mut replacements = Vec::new();
        for binding in bindings {
            match binding.value.as_deref() {
                None => self.reporter.report(&ScaffoldEvent::VariableSkipped {
                    variable: binding.variable,
                }),
                Some(value) => {
                    let event = if value.is_empty() {
                        ScaffoldEvent::VariableEmpty {
                            variable: binding.variable,
                        }
                    } else {
                        ScaffoldEvent::VariableSet {
                            variable: binding.variable,
                            value: value.to_string(),
                        }
                    };
                    self.reporter.report(&event);
                    replacements.push((binding.token.as_str(), value));
                }
            }
        }
        replacements
    }

    fn candidate_files(&self, target: &Path) -> JumpstartResult<Vec<PathBuf>> {
        Ok(self
            .filesystem
            .list_files(target)?
            .into_iter()
            .filter(|path| !inside_vcs_dir(target, path))
            .collect())
    }

    fn skip(&self, path: &Path, report: &mut SubstitutionReport) {
        self.reporter.report(&ScaffoldEvent::FileSkipped {
            path: path.to_path_buf(),
            reason: "not valid UTF-8".into(),
        });
        report.skipped_files.push(path.to_path_buf());
    }
}

fn inside_vcs_dir(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| c == Component::Normal(OsStr::new(VCS_DIR)))
}
