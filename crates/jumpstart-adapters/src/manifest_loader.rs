//! YAML manifest loader.
//!
//! Reads `jumpstart.yaml` (or `jumpstart.yml`) from a template directory and
//! validates it into a [`TemplateManifest`].
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── node/
//! │   ├── jumpstart.yaml       ← manifest
//! │   └── files/               ← content copied by a `copy` step
//! └── plain/
//!     └── files/               ← no manifest: copied as-is
//! ```

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tracing::{debug, instrument};

use jumpstart_core::{
    application::{ApplicationError, ports::ManifestLoader},
    domain::{DomainError, LEGACY_FILES_DIR, ManifestDocument, TemplateManifest},
    error::JumpstartResult,
};

/// Manifest file names, in lookup order.
pub const MANIFEST_FILE_NAMES: [&str; 2] = ["jumpstart.yaml", "jumpstart.yml"];

/// Loads manifests from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlManifestLoader;

impl YamlManifestLoader {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestLoader for YamlManifestLoader {
    #[instrument(skip(self), fields(dir = %directory.display()))]
    fn load(&self, directory: &Path) -> JumpstartResult<TemplateManifest> {
        for name in MANIFEST_FILE_NAMES {
            let path = directory.join(name);
            if !path.is_file() {
                continue;
            }

            let raw = fs::read_to_string(&path).map_err(|e| ApplicationError::FilesystemError {
                path: path.clone(),
                reason: format!("Failed to read manifest: {e}"),
            })?;
            debug!(manifest = %path.display(), "Parsing manifest");
            return Ok(parse_manifest(&raw, &path)?);
        }

        let files_dir = directory.join(LEGACY_FILES_DIR);
        if files_dir.is_dir() {
            debug!("No manifest, using legacy files/ layout");
            return Ok(TemplateManifest::legacy(files_dir));
        }

        Err(DomainError::ManifestMissing {
            directory: directory.to_path_buf(),
        }
        .into())
    }
}

/// Parse and validate manifest text read from `path`.
///
/// # Errors
///
/// [`DomainError::ManifestInvalid`] for YAML or schema errors (the detail
/// carries line and column when the parser knows them), plus whatever
/// [`TemplateManifest::from_document`] rejects.
pub fn parse_manifest(raw: &str, path: &Path) -> Result<TemplateManifest, DomainError> {
    let document: ManifestDocument =
        serde_yaml::from_str(raw).map_err(|e| DomainError::ManifestInvalid {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    TemplateManifest::from_document(document, path)
}

/// JSON Schema (draft-07) describing the manifest format.
pub fn json_schema() -> Value {
    let relative_path = json!({
        "type": "string",
        "minLength": 1,
        "description": "Relative path; must not be absolute or climb above its root"
    });

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "$id": "https://jumpstart.dev/jumpstart.schema.json",
        "title": "jumpstart template manifest",
        "type": "object",
        "additionalProperties": false,
        "required": ["jumpstart"],
        "properties": {
            "jumpstart": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "extends": {
                        "description": "Templates whose steps run before this one's",
                        "oneOf": [
                            { "type": "string", "minLength": 1 },
                            { "type": "array", "items": { "type": "string", "minLength": 1 } }
                        ]
                    },
                    "steps": {
                        "type": "array",
                        "items": {
                            "oneOf": [
                                {
                                    "type": "object",
                                    "additionalProperties": false,
                                    "required": ["copy"],
                                    "properties": {
                                        "copy": {
                                            "type": "object",
                                            "additionalProperties": false,
                                            "required": ["from"],
                                            "properties": {
                                                "from": relative_path,
                                                "to": relative_path
                                            }
                                        }
                                    }
                                },
                                {
                                    "type": "object",
                                    "additionalProperties": false,
                                    "required": ["run"],
                                    "properties": {
                                        "run": {
                                            "type": "array",
                                            "items": { "type": "string" },
                                            "description": "Commands joined with && and run in the destination"
                                        }
                                    }
                                }
                            ]
                        }
                    },
                    "post-copy": {
                        "type": "array",
                        "items": { "type": "string" },
                        "deprecated": true,
                        "description": "Legacy form of a trailing run step"
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpstart_core::domain::Step;
    use jumpstart_core::error::JumpstartError;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_yaml_manifest() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "jumpstart.yaml",
            "jumpstart:\n  extends: base\n  steps:\n    - copy: { from: ./files }\n",
        );

        let manifest = YamlManifestLoader.load(temp.path()).unwrap();
        assert_eq!(manifest.extends(), &["base".to_string()]);
        assert_eq!(manifest.steps().len(), 1);
        assert!(!manifest.origin().is_legacy());
    }

    #[test]
    fn yml_extension_is_accepted() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "jumpstart.yml", "jumpstart:\n  steps: []\n");
        assert!(YamlManifestLoader.load(temp.path()).is_ok());
    }

    #[test]
    fn files_dir_without_manifest_is_legacy() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "files/README.md", "hi");

        let manifest = YamlManifestLoader.load(temp.path()).unwrap();
        assert!(manifest.origin().is_legacy());
        assert!(matches!(manifest.steps(), [Step::Copy(_)]));
    }

    #[test]
    fn empty_directory_is_missing() {
        let temp = TempDir::new().unwrap();
        let err = YamlManifestLoader.load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            JumpstartError::Domain(DomainError::ManifestMissing { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_invalid_with_path() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "jumpstart.yaml", "jumpstart:\n  steps: [\n");

        let err = YamlManifestLoader.load(temp.path()).unwrap_err();
        match err {
            JumpstartError::Domain(DomainError::ManifestInvalid { path, .. }) => {
                assert_eq!(path, temp.path().join("jumpstart.yaml"));
            }
            other => panic!("expected ManifestInvalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_top_level_key_is_invalid() {
        let err = parse_manifest("steps: []\n", Path::new("/t/jumpstart.yaml")).unwrap_err();
        assert!(matches!(err, DomainError::ManifestInvalid { .. }));
    }

    #[test]
    fn unknown_step_shape_is_reported() {
        let err = parse_manifest(
            "jumpstart:\n  steps:\n    - unknown: {}\n",
            Path::new("/t/jumpstart.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::UnknownStepShape { index: 0, .. }));
    }

    #[test]
    fn schema_describes_both_step_shapes() {
        let schema = json_schema();
        let shapes = &schema["properties"]["jumpstart"]["properties"]["steps"]["items"]["oneOf"];
        assert_eq!(shapes.as_array().map(Vec::len), Some(2));
        assert_eq!(schema["required"][0], "jumpstart");
    }
}
