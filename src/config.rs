use std::time::Duration;

use ::config::{builder::DefaultState, ConfigBuilder, Environment, File};
use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{dictionary::DEFAULT_WORD_COUNT, game::grid::DEFAULT_MAX_ATTEMPTS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub puzzle: PuzzleConfig,
    pub export: ExportConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleConfig {
    pub word_list_path: String,
    pub grid_size: usize,
    pub word_count: usize,
    pub max_attempts: usize,
    pub min_grid_size: usize,
    pub max_grid_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub template_path: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds a board may sit unused with no live connections before removal
    pub idle_grace_secs: u64,
}

impl Config {
    /// Defaults, then `wordsearch.toml` if present, then `WORDSEARCH__SECTION__KEY` variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = Self::defaults_builder()?
            .add_source(File::with_name("wordsearch").required(false))
            .add_source(
                Environment::with_prefix("WORDSEARCH")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::finish(builder)
    }

    fn defaults_builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(::config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("puzzle.word_list_path", "./words.txt")?
            .set_default("puzzle.grid_size", 20_i64)?
            .set_default("puzzle.word_count", DEFAULT_WORD_COUNT as i64)?
            .set_default("puzzle.max_attempts", DEFAULT_MAX_ATTEMPTS as i64)?
            .set_default("puzzle.min_grid_size", 5_i64)?
            .set_default("puzzle.max_grid_size", 40_i64)?
            .set_default("export.template_path", "./templates/index.html")?
            .set_default("export.output_dir", "./exported")?
            .set_default("session.idle_grace_secs", 600_i64)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Config = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Configuration has missing or malformed values")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let puzzle = &self.puzzle;
        ensure!(
            puzzle.min_grid_size >= 1 && puzzle.min_grid_size <= puzzle.max_grid_size,
            "min_grid_size must be between 1 and max_grid_size"
        );
        ensure!(
            (puzzle.min_grid_size..=puzzle.max_grid_size).contains(&puzzle.grid_size),
            "grid_size {} must be between {} and {}",
            puzzle.grid_size,
            puzzle.min_grid_size,
            puzzle.max_grid_size
        );
        ensure!(puzzle.max_attempts > 0, "max_attempts must be positive");
        ensure!(puzzle.word_count > 0, "word_count must be positive");
        Ok(())
    }

    /// Configuration with built-in defaults only
    #[cfg(test)]
    pub fn defaults() -> Result<Self> {
        Self::finish(Self::defaults_builder()?)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn idle_grace_period(&self) -> Duration {
        Duration::from_secs(self.session.idle_grace_secs)
    }

    pub fn grid_size_allowed(&self, size: usize) -> bool {
        (self.puzzle.min_grid_size..=self.puzzle.max_grid_size).contains(&size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.puzzle.grid_size, 20);
        assert_eq!(config.puzzle.word_count, 10);
        assert_eq!(config.puzzle.max_attempts, 10_000);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.idle_grace_period(), Duration::from_secs(600));
    }

    #[test]
    fn test_overrides_are_applied() {
        let builder = Config::defaults_builder()
            .unwrap()
            .set_override("puzzle.grid_size", 12_i64)
            .unwrap()
            .set_override("server.port", 8080_i64)
            .unwrap();
        let config = Config::finish(builder).unwrap();
        assert_eq!(config.puzzle.grid_size, 12);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_grid_size_outside_limits_rejected() {
        let builder = Config::defaults_builder()
            .unwrap()
            .set_override("puzzle.grid_size", 3_i64)
            .unwrap();
        assert!(Config::finish(builder).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let builder = Config::defaults_builder()
            .unwrap()
            .set_override("puzzle.max_attempts", 0_i64)
            .unwrap();
        assert!(Config::finish(builder).is_err());
    }

    #[test]
    fn test_grid_size_allowed() {
        let config = Config::defaults().unwrap();
        assert!(config.grid_size_allowed(5));
        assert!(config.grid_size_allowed(40));
        assert!(!config.grid_size_allowed(4));
        assert!(!config.grid_size_allowed(41));
    }
}
