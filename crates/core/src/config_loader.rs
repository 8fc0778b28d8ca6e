use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration by layering defaults, a TOML file, `SPEECH_`
    /// environment variables and an optional JSON file next to the TOML one.
    ///
    /// Nested keys use `__` in environment variables, e.g.
    /// `SPEECH_FEATURES__WINDOW=10`.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or a value has the wrong type.
    pub fn load(path: impl AsRef<Path>) -> Result<AppConfig> {
        Self::layered(path.as_ref(), None)
    }

    /// Loads configuration with a profile overlay (`Config.{profile}.toml`).
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or a value has the wrong type.
    pub fn load_with_profile(path: impl AsRef<Path>, profile: &str) -> Result<AppConfig> {
        Self::layered(path.as_ref(), Some(profile))
    }

    /// Config files that take part in a load, in merge order, and whether each exists.
    #[must_use]
    pub fn file_layers(path: &Path, profile: Option<&str>) -> Vec<(PathBuf, bool)> {
        let mut files = vec![path.to_path_buf()];
        if let Some(profile) = profile {
            files.push(path.with_file_name(format!("Config.{profile}.toml")));
        }
        files.push(path.with_extension("json"));
        files
            .into_iter()
            .map(|file| {
                let present = file.is_file();
                (file, present)
            })
            .collect()
    }

    fn layered(path: &Path, profile: Option<&str>) -> Result<AppConfig> {
        for (file, present) in Self::file_layers(path, profile) {
            if present {
                debug!("Config layer: {}", file.display());
            } else {
                debug!("Config layer skipped (not found): {}", file.display());
            }
        }

        let mut figment = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path));
        if let Some(profile) = profile {
            let profile_path = path.with_file_name(format!("Config.{profile}.toml"));
            figment = figment.merge(Toml::file(profile_path));
        }
        let config: AppConfig = figment
            .merge(Env::prefixed("SPEECH_").split("__"))
            .join(Json::file(path.with_extension("json")))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Interval;
    use std::fs;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load(dir.path().join("Config.toml")).unwrap();
        assert_eq!(config.features.window, 5);
        assert!((config.features.quantile - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.data.interval, Interval::OneDay);
        assert_eq!(config.sentiment.max_attempts, 5);
    }

    #[test]
    fn toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(
            &path,
            "[data]\nticker = \"^STOXX50E\"\ninterval = \"1h\"\nstart = \"2019-01-01\"\n\n[features]\nwindow = 10\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.data.ticker, "^STOXX50E");
        assert_eq!(config.data.interval, Interval::OneHour);
        assert_eq!(
            config.data.start,
            chrono::NaiveDate::from_ymd_opt(2019, 1, 1)
        );
        assert_eq!(config.features.window, 10);
        assert!((config.features.quantile - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn profile_overlay_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "[features]\nquantile = 0.8\n").unwrap();
        fs::write(dir.path().join("Config.strict.toml"), "[features]\nquantile = 0.95\n").unwrap();

        let config = ConfigLoader::load_with_profile(&path, "strict").unwrap();
        assert!((config.features.quantile - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "[data]\ninterval = \"7x\"\n").unwrap();
        assert!(ConfigLoader::load(&path).is_err());
    }

    #[test]
    fn file_layers_follow_merge_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Config.toml");
        fs::write(&path, "[features]\nwindow = 3\n").unwrap();

        let layers = ConfigLoader::file_layers(&path, Some("research"));
        let names: Vec<_> = layers
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Config.toml", "Config.research.toml", "Config.json"]);
        assert_eq!(
            layers.iter().map(|(_, present)| *present).collect::<Vec<_>>(),
            vec![true, false, false]
        );

        let without_profile = ConfigLoader::file_layers(&path, None);
        assert_eq!(without_profile.len(), 2);
    }
}
