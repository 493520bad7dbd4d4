//! `shadow-hpa init` — scaffold a shadow.toml.

use std::path::Path;

use anyhow::{bail, Result};
use shadow_core::{Policy, ShadowConfig};

pub fn init(path: &str, target: f64, force: bool) -> Result<()> {
    let output = Path::new(path);
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    // Reject a target the simulate command would refuse anyway.
    Policy::new(1, 10, target)?;

    let config = ShadowConfig::scaffold(target);
    std::fs::write(output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow.toml");
        let path_str = path.to_str().unwrap();

        init(path_str, 65.0, false).unwrap();
        let config = ShadowConfig::from_file(&path).unwrap();
        assert_eq!(config.policy().target_utilization, Some(65.0));
    }

    #[test]
    fn rejects_invalid_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow.toml");
        assert!(init(path.to_str().unwrap(), 150.0, false).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shadow.toml");
        std::fs::write(&path, "# mine\n").unwrap();
        let path_str = path.to_str().unwrap();

        assert!(init(path_str, 50.0, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        init(path_str, 50.0, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[policy]"));
    }
}
