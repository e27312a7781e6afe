// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, fs, path::Path};
use tracing::{debug, info};

use crate::api::{default_static_files, Api, Mode};

pub const ENV_CONFIG: &str = "ADMINPANEL_CONFIG";
pub const ENV_ORIGIN: &str = "ADMINPANEL_ORIGIN";
pub const ENV_DEMO: &str = "ADMINPANEL_DEMO";
pub const ENV_DATA_PATH: &str = "ADMINPANEL_DATA_PATH";

/// Endpoints the panel talks to, relative to `Config::origin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub accounts: String,
    pub users: String,
    pub save_account: String,
    pub save_user: String,
    pub reset_password: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            accounts: "api/admin.php?req=accounts".into(),
            users: "api/admin.php?req=users".into(),
            save_account: "api/admin.php?req=save_account".into(),
            save_user: "api/admin.php?req=save_user".into(),
            reset_password: "api/admin.php?req=reset_password".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL relative endpoints resolve against.
    pub origin: String,
    /// Serve reads from static files and ignore writes.
    pub demo: bool,
    /// Prefix for static files in demo mode, concatenated as is.
    pub data_path: String,
    /// Logical endpoint → static file name.
    pub static_files: BTreeMap<String, String>,
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: "http://localhost/".into(),
            demo: false,
            data_path: "data/".into(),
            static_files: default_static_files(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file; missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let config: Config =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// `ADMINPANEL_CONFIG` (optional file), then the per-field env overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var(ENV_CONFIG) {
            Ok(path) => Self::load(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        info!(origin = %config.origin, demo = config.demo, "configuration ready");
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin = origin;
        }
        if let Some(flag) = lookup(ENV_DEMO) {
            self.demo = parse_flag(&flag).with_context(|| format!("{}={:?}", ENV_DEMO, flag))?;
        }
        if let Some(data_path) = lookup(ENV_DATA_PATH) {
            self.data_path = data_path;
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        if self.demo {
            Mode::Demo {
                data_path: self.data_path.clone(),
            }
        } else {
            Mode::Live
        }
    }

    pub fn build_api(&self) -> Result<Api> {
        let api = Api::new(&self.origin)
            .with_context(|| format!("building API client for {}", self.origin))?
            .with_static_files(self.static_files.clone())
            .with_mode(self.mode());
        Ok(api)
    }
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert!(!c.demo);
        assert_eq!(c.data_path, "data/");
        assert_eq!(
            c.static_files.get("api/admin.php?req=accounts").map(String::as_str),
            Some("accounts.tsv")
        );
        assert_eq!(
            c.static_files.get("api/admin.php?req=users").map(String::as_str),
            Some("users.tsv")
        );
        assert_eq!(c.mode(), Mode::Live);
    }

    #[test]
    fn test_load_partial_yaml() -> Result<()> {
        let mut f = NamedTempFile::new()?;
        writeln!(
            f,
            "origin: https://panel.example.com/admin/\ndemo: true\nendpoints:\n  users: api/users.tsv\n"
        )?;

        let c = Config::load(f.path())?;
        assert_eq!(c.origin, "https://panel.example.com/admin/");
        assert!(c.demo);
        assert_eq!(c.endpoints.users, "api/users.tsv");
        assert_eq!(c.endpoints.accounts, "api/admin.php?req=accounts");
        assert_eq!(
            c.mode(),
            Mode::Demo {
                data_path: "data/".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_yaml() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "demo: [not, a, bool]").unwrap();
        assert!(Config::load(f.path()).is_err());
    }

    #[test]
    fn test_overrides() -> Result<()> {
        let vars: HashMap<&str, &str> = [
            (ENV_ORIGIN, "http://127.0.0.1:8080/"),
            (ENV_DEMO, "yes"),
            (ENV_DATA_PATH, "static/"),
        ]
        .into_iter()
        .collect();

        let mut c = Config::default();
        c.apply_overrides(|k| vars.get(k).map(|v| v.to_string()))?;
        assert_eq!(c.origin, "http://127.0.0.1:8080/");
        assert_eq!(
            c.mode(),
            Mode::Demo {
                data_path: "static/".into()
            }
        );

        let mut c = Config::default();
        assert!(c
            .apply_overrides(|k| (k == ENV_DEMO).then(|| "maybe".to_string()))
            .is_err());
        Ok(())
    }

    #[test]
    fn test_build_api() -> Result<()> {
        let mut c = Config::default();
        c.demo = true;
        let api = c.build_api()?;
        assert!(api.is_demo());

        c.origin = "not a url".into();
        assert!(c.build_api().is_err());
        Ok(())
    }
}
