//! Deployment policy for the merge pipeline
//!
//! The source deployments of this job differed in three ways: whether a
//! missing join key aborts or is synthesized, which join kind is used, and
//! which alternate key spellings are folded into the canonical name. Those
//! knobs live here as one policy value, loadable from a YAML file and
//! overridable from the command line.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, Result};

/// Join kind plus missing-key behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    /// Require the key column in both datasets and inner-join.
    #[default]
    Strict,
    /// Synthesize an all-null key column when missing and outer-join.
    Lenient,
}

/// One alternate-spelling rule for the join key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRename {
    pub from: String,
    pub to: String,
}

impl KeyRename {
    /// Parse a command-line `OLD=NEW` spec.
    pub fn parse(spec: &str) -> Result<Self> {
        match spec.split_once('=') {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => Ok(Self {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => Err(MergeError::InvalidRenameSpec {
                spec: spec.to_string(),
            }),
        }
    }
}

/// Policy for one merge invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergePolicy {
    #[serde(default)]
    pub mode: JoinMode,

    /// Alternate key spellings folded into the canonical name before joining.
    #[serde(default = "default_key_renames")]
    pub key_renames: Vec<KeyRename>,

    /// Read the input objects from under `raw/` instead of the bucket root.
    #[serde(default)]
    pub raw_prefix: bool,
}

fn default_key_renames() -> Vec<KeyRename> {
    // One upstream extract labels the person identifier "Homeless ID".
    vec![KeyRename {
        from: "Homeless ID".to_string(),
        to: "HID".to_string(),
    }]
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            mode: JoinMode::default(),
            key_renames: default_key_renames(),
            raw_prefix: false,
        }
    }
}

impl MergePolicy {
    /// Load a policy from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| MergeError::PolicyReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        serde_yaml::from_str(&contents).map_err(|e| MergeError::PolicyParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_strict_with_homeless_id_rename() {
        let policy = MergePolicy::default();
        assert_eq!(policy.mode, JoinMode::Strict);
        assert!(!policy.raw_prefix);
        assert_eq!(policy.key_renames.len(), 1);
        assert_eq!(policy.key_renames[0].from, "Homeless ID");
        assert_eq!(policy.key_renames[0].to, "HID");
    }

    #[test]
    fn test_parse_rename_spec() {
        let rename = KeyRename::parse("Homeless ID=HID").unwrap();
        assert_eq!(rename.from, "Homeless ID");
        assert_eq!(rename.to, "HID");
    }

    #[test]
    fn test_parse_rename_spec_rejects_bad_forms() {
        assert!(KeyRename::parse("no-equals").is_err());
        assert!(KeyRename::parse("=HID").is_err());
        assert!(KeyRename::parse("Homeless ID=").is_err());
    }

    #[test]
    fn test_yaml_policy_defaults_apply() {
        let policy: MergePolicy = serde_yaml::from_str("mode: lenient\n").unwrap();
        assert_eq!(policy.mode, JoinMode::Lenient);
        assert!(!policy.raw_prefix);
        assert_eq!(policy.key_renames, default_key_renames());
    }

    #[test]
    fn test_yaml_policy_full() {
        let yaml = "mode: strict\nraw_prefix: true\nkey_renames:\n  - from: PID\n    to: HID\n";
        let policy: MergePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.mode, JoinMode::Strict);
        assert!(policy.raw_prefix);
        assert_eq!(policy.key_renames[0].from, "PID");
    }
}
