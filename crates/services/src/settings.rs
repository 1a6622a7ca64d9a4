use std::path::PathBuf;
use std::time::Duration;

use api::{DEFAULT_BASE_URL, RestConfig};
use config::{Config, Environment, File};
use quiz_core::model::DEFAULT_RANKING_SIZE;
use serde::Deserialize;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const ENV_PREFIX: &str = "QUIZ";
const DEFAULT_FILE: &str = "quiz";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuizSettings {
    pub shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankingSettings {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub quiz: QuizSettings,
    pub ranking: RankingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            quiz: QuizSettings::default(),
            ranking: RankingSettings {
                limit: DEFAULT_RANKING_SIZE,
            },
        }
    }
}

impl Settings {
    #[must_use]
    pub fn rest_config(&self) -> RestConfig {
        RestConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }
}

/// Values supplied on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub config_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub ranking_limit: Option<usize>,
}

/// Layer defaults, the config file, `QUIZ__*` environment variables and
/// command-line overrides.
///
/// Without an explicit file, `quiz.toml` in the working directory is read if
/// present. An explicit file must exist.
///
/// # Errors
///
/// Returns `config::ConfigError` if a source cannot be read or the merged
/// values do not deserialize into `Settings`.
pub fn load_settings(overrides: &SettingsOverrides) -> Result<Settings, config::ConfigError> {
    let defaults = Settings::default();
    let mut builder = Config::builder()
        .set_default("api.base_url", defaults.api.base_url)?
        .set_default("api.timeout_secs", defaults.api.timeout_secs)?
        .set_default("quiz.shuffle", defaults.quiz.shuffle)?
        .set_default("ranking.limit", defaults.ranking.limit as u64)?;

    builder = match &overrides.config_file {
        Some(path) => builder.add_source(File::from(path.as_path()).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_FILE).required(false)),
    };
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    if let Some(url) = &overrides.base_url {
        builder = builder.set_override("api.base_url", url.as_str())?;
    }
    if let Some(limit) = overrides.ranking_limit {
        builder = builder.set_override("ranking.limit", limit as u64)?;
    }

    let settings: Settings = builder.build()?.try_deserialize()?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_service() {
        let settings = Settings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8089/api");
        assert!(!settings.quiz.shuffle);
        assert_eq!(settings.ranking.limit, 10);
        assert_eq!(settings.rest_config().timeout, Duration::from_secs(10));
    }

    #[test]
    fn file_and_cli_overrides_are_layered() {
        let path = std::env::temp_dir().join(format!("quiz-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://file.test/api\"\ntimeout_secs = 3\n\n[quiz]\nshuffle = true"
        )
        .unwrap();

        let overrides = SettingsOverrides {
            config_file: Some(path.clone()),
            base_url: None,
            ranking_limit: Some(5),
        };
        let settings = load_settings(&overrides).unwrap();
        assert_eq!(settings.api.base_url, "http://file.test/api");
        assert_eq!(settings.api.timeout_secs, 3);
        assert!(settings.quiz.shuffle);
        assert_eq!(settings.ranking.limit, 5);

        let overrides = SettingsOverrides {
            base_url: Some("http://cli.test/api".into()),
            ..overrides
        };
        let settings = load_settings(&overrides).unwrap();
        assert_eq!(settings.api.base_url, "http://cli.test/api");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let overrides = SettingsOverrides {
            config_file: Some(PathBuf::from("/nonexistent/quiz-settings.toml")),
            ..SettingsOverrides::default()
        };
        assert!(load_settings(&overrides).is_err());
    }
}
