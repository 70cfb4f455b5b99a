//! Placeholder variables substituted into a freshly scaffolded tree.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::domain::error::DomainError;

pub const DEFAULT_NAMESPACE: &str = "JUMPSTART";

/// The variables every scaffold run binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    ProjectName,
    GithubUser,
    ProjectDescription,
}

impl Variable {
    /// Binding order.
    pub const ALL: [Variable; 3] = [
        Variable::ProjectName,
        Variable::GithubUser,
        Variable::ProjectDescription,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ProjectName => "PROJECT_NAME",
            Self::GithubUser => "GITHUB_USER",
            Self::ProjectDescription => "PROJECT_DESCRIPTION",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How variable names map onto placeholder tokens and environment keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNamespace {
    namespace: String,
    env_prefix: String,
}

impl VariableNamespace {
    pub fn new(namespace: impl Into<String>, env_prefix: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            env_prefix: env_prefix.into(),
        }
    }

    /// `__JUMPSTART_PROJECT_NAME__`
    pub fn token(&self, variable: Variable) -> String {
        format!("__{}_{}__", self.namespace, variable.name())
    }

    /// Prefix shared by every token; used to find leftovers.
    pub fn marker(&self) -> String {
        format!("__{}_", self.namespace)
    }

    /// `JUMPSTART_PROJECT_NAME`
    pub fn env_key(&self, variable: Variable) -> String {
        format!("{}_{}", self.env_prefix, variable.name())
    }
}

impl Default for VariableNamespace {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE, DEFAULT_NAMESPACE)
    }
}

/// A token and the value it is replaced with. `None` means the token is
/// left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBinding {
    pub variable: Variable,
    pub token: String,
    pub value: Option<String>,
}

impl VariableBinding {
    pub fn new(namespace: &VariableNamespace, variable: Variable, value: Option<String>) -> Self {
        Self {
            variable,
            token: namespace.token(variable),
            value,
        }
    }
}

/// Environment overrides, captured once at startup.
///
/// Empty values are not overrides: the variable is derived as usual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableOverrides {
    values: BTreeMap<Variable, String>,
}

impl VariableOverrides {
    /// Pick the override keys for `namespace` out of an environment snapshot.
    pub fn capture<I, K, V>(namespace: &VariableNamespace, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let keys: Vec<(String, Variable)> = Variable::ALL
            .iter()
            .map(|v| (namespace.env_key(*v), *v))
            .collect();

        let mut values = BTreeMap::new();
        for (key, value) in vars {
            let Some((_, variable)) = keys.iter().find(|(k, _)| k == key.as_ref()) else {
                continue;
            };
            let value = value.into();
            if !value.is_empty() {
                values.insert(*variable, value);
            }
        }
        Self { values }
    }

    pub fn with(mut self, variable: Variable, value: impl Into<String>) -> Self {
        self.values.insert(variable, value.into());
        self
    }

    pub fn get(&self, variable: Variable) -> Option<&str> {
        self.values.get(&variable).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `PROJECT_NAME` is the last segment of the destination path.
pub fn derive_project_name(destination: &Path) -> Result<String, DomainError> {
    destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DomainError::DerivationFailure {
            variable: Variable::ProjectName.name().to_string(),
            reason: format!("'{}' has no final path segment", destination.display()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_carry_the_namespace() {
        let ns = VariableNamespace::default();
        assert_eq!(ns.token(Variable::ProjectName), "__JUMPSTART_PROJECT_NAME__");
        assert_eq!(ns.marker(), "__JUMPSTART_");
        assert_eq!(ns.env_key(Variable::GithubUser), "JUMPSTART_GITHUB_USER");

        let custom = VariableNamespace::new("ACME", "ACME_TPL");
        assert_eq!(custom.token(Variable::ProjectDescription), "__ACME_PROJECT_DESCRIPTION__");
        assert_eq!(custom.env_key(Variable::ProjectName), "ACME_TPL_PROJECT_NAME");
    }

    #[test]
    fn capture_keeps_only_known_non_empty_keys() {
        let ns = VariableNamespace::default();
        let overrides = VariableOverrides::capture(
            &ns,
            vec![
                ("JUMPSTART_PROJECT_NAME", "custom"),
                ("JUMPSTART_GITHUB_USER", ""),
                ("JUMPSTART_OTHER", "x"),
                ("HOME", "/root"),
            ],
        );
        assert_eq!(overrides.get(Variable::ProjectName), Some("custom"));
        assert_eq!(overrides.get(Variable::GithubUser), None);
        assert_eq!(overrides.get(Variable::ProjectDescription), None);
    }

    #[test]
    fn project_name_is_last_segment() {
        assert_eq!(derive_project_name(Path::new("/tmp/dest")).unwrap(), "dest");
        assert!(matches!(
            derive_project_name(Path::new("/")),
            Err(DomainError::DerivationFailure { .. })
        ));
    }
}
