//! Generator configuration
//!
//! Directories and the failure policy can be given directly or read from a
//! flat option map (`livingdoc.settings.dir`, `livingdoc.out.dir`,
//! `livingdoc.failure.policy`).

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};

/// Option key for the settings directory
pub const KEY_SETTINGS_DIR: &str = "livingdoc.settings.dir";
/// Default settings directory
pub const DEF_SETTINGS_DIR: &str = ".";
/// Option key for the output directory
pub const KEY_OUT_DIR: &str = "livingdoc.out.dir";
/// Default output directory
pub const DEF_OUT_DIR: &str = "./out";
/// Option key for the failure policy
pub const KEY_FAILURE_POLICY: &str = "livingdoc.failure.policy";

/// What happens when one diagram fails to resolve, render or write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FailurePolicy {
    /// Stop the run at the first failing diagram
    #[default]
    Abort,
    /// Record the failure and carry on with the remaining diagrams
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Continue => write!(f, "continue"),
        }
    }
}

/// Directories and policy for one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub settings_dir: PathBuf,
    pub out_dir: PathBuf,
    pub failure_policy: FailurePolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            settings_dir: PathBuf::from(DEF_SETTINGS_DIR),
            out_dir: PathBuf::from(DEF_OUT_DIR),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from an option map, falling back to defaults
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(dir) = options.get(KEY_SETTINGS_DIR) {
            config.settings_dir = PathBuf::from(dir);
        }
        if let Some(dir) = options.get(KEY_OUT_DIR) {
            config.out_dir = PathBuf::from(dir);
        }
        if let Some(policy) = options.get(KEY_FAILURE_POLICY) {
            config.failure_policy = policy
                .parse()
                .map_err(|e| anyhow!("Invalid value for {}: {}", KEY_FAILURE_POLICY, e))?;
        }
        Ok(config)
    }

    pub fn with_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings_dir = dir.into();
        self
    }

    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = dir.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.settings_dir, PathBuf::from("."));
        assert_eq!(config.out_dir, PathBuf::from("./out"));
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_from_options() {
        let options = HashMap::from([
            (KEY_SETTINGS_DIR.to_string(), "docs/uml".to_string()),
            (KEY_OUT_DIR.to_string(), "target/uml".to_string()),
            (KEY_FAILURE_POLICY.to_string(), "Continue".to_string()),
        ]);
        let config = GeneratorConfig::from_options(&options).unwrap();
        assert_eq!(config.settings_dir, PathBuf::from("docs/uml"));
        assert_eq!(config.out_dir, PathBuf::from("target/uml"));
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
    }

    #[test]
    fn test_from_options_partial() {
        let options = HashMap::from([(KEY_OUT_DIR.to_string(), "build".to_string())]);
        let config = GeneratorConfig::from_options(&options).unwrap();
        assert_eq!(config.settings_dir, PathBuf::from(DEF_SETTINGS_DIR));
        assert_eq!(config.out_dir, PathBuf::from("build"));
    }

    #[test]
    fn test_invalid_policy() {
        let options = HashMap::from([(KEY_FAILURE_POLICY.to_string(), "sometimes".to_string())]);
        let err = GeneratorConfig::from_options(&options).unwrap_err();
        assert!(err.to_string().contains("livingdoc.failure.policy"));
    }

    #[test]
    fn test_policy_round_trip_names() {
        assert_eq!(FailurePolicy::Abort.to_string(), "abort");
        assert_eq!("continue".parse::<FailurePolicy>().unwrap(), FailurePolicy::Continue);
        assert!("".parse::<FailurePolicy>().is_err());
    }
}
