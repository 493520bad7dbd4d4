//! shadow.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShadowConfig {
    pub policy: Option<PolicyConfig>,
    pub analysis: Option<AnalysisConfig>,
}

/// `[policy]` — the autoscaling policy to replay. Every key is optional so
/// command-line flags can fill the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub min_replicas: Option<u32>,
    pub max_replicas: Option<u32>,
    pub target_utilization: Option<f64>,
    pub tolerance: Option<f64>,
    pub scale_down_window: Option<String>,
}

/// `[analysis]` — regret metric settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub risk_lookahead: Option<String>,
}

impl ShadowConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A fully populated config with the built-in defaults.
    pub fn scaffold(target_utilization: f64) -> Self {
        ShadowConfig {
            policy: Some(PolicyConfig {
                min_replicas: Some(1),
                max_replicas: Some(10),
                target_utilization: Some(target_utilization),
                tolerance: Some(0.1),
                scale_down_window: Some("5m".to_string()),
            }),
            analysis: Some(AnalysisConfig {
                risk_lookahead: Some("5m".to_string()),
            }),
        }
    }

    pub fn policy(&self) -> PolicyConfig {
        self.policy.clone().unwrap_or_default()
    }

    /// `[policy].scale_down_window`, parsed.
    pub fn scale_down_window(&self) -> Result<Option<Duration>, ConfigError> {
        parse_field(
            "policy.scale_down_window",
            self.policy.as_ref().and_then(|p| p.scale_down_window.as_deref()),
        )
    }

    /// `[analysis].risk_lookahead`, parsed.
    pub fn risk_lookahead(&self) -> Result<Option<Duration>, ConfigError> {
        parse_field(
            "analysis.risk_lookahead",
            self.analysis.as_ref().and_then(|a| a.risk_lookahead.as_deref()),
        )
    }
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    raw.map(parse_duration)
        .transpose()
        .map_err(|source| ConfigError::Duration { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_roundtrips() {
        let config = ShadowConfig::scaffold(50.0);
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[policy]"));
        assert!(toml_str.contains("target_utilization = 50.0"));

        let back: ShadowConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.policy().max_replicas, Some(10));
        assert_eq!(back.risk_lookahead().unwrap(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_parse_partial() {
        let toml_str = r#"
[policy]
target_utilization = 70
scale_down_window = "10m"
"#;
        let config: ShadowConfig = toml::from_str(toml_str).unwrap();
        let policy = config.policy();
        assert_eq!(policy.target_utilization, Some(70.0));
        assert_eq!(policy.min_replicas, None);
        assert_eq!(config.scale_down_window().unwrap(), Some(Duration::from_secs(600)));
        assert_eq!(config.risk_lookahead().unwrap(), None);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: ShadowConfig = toml::from_str("").unwrap();
        assert!(config.policy.is_none());
        assert_eq!(config.scale_down_window().unwrap(), None);
    }

    #[test]
    fn test_bad_duration_names_field() {
        let toml_str = r#"
[analysis]
risk_lookahead = "soon"
"#;
        let config: ShadowConfig = toml::from_str(toml_str).unwrap();
        let err = config.risk_lookahead().unwrap_err();
        assert!(err.to_string().contains("analysis.risk_lookahead"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow.toml");
        std::fs::write(&path, "[policy]\nmin_replicas = 3\n").unwrap();

        let config = ShadowConfig::from_file(&path).unwrap();
        assert_eq!(config.policy().min_replicas, Some(3));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ShadowConfig::from_file(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
