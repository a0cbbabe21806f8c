use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_PATH_ENV: &str = "BACKLOG_CONFIG";
pub const GENERATOR_COMMAND_ENV: &str = "BACKLOG_GENERATOR_COMMAND";
const DEFAULT_CONFIG_FILE: &str = "backlog.toml";

#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    /// File whose text becomes the prompt; `{backlog}` is replaced with the
    /// raw backlog.
    #[serde(default)]
    pub prompt_template: Option<PathBuf>,
    #[serde(default = "default_quota_markers")]
    pub quota_markers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            prompt_template: None,
            quota_markers: default_quota_markers(),
        }
    }
}

fn default_quota_markers() -> Vec<String> {
    ["RESOURCE_EXHAUSTED", "429", "quota", "rate limit"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl CliConfig {
    pub fn parse(toml_str: &str) -> Result<Self> {
        toml::from_str::<CliConfig>(toml_str).context("failed to parse backlog configuration TOML")
    }

    /// Reads the config file named by `explicit`, else `BACKLOG_CONFIG`, else
    /// `backlog.toml` when it exists. No file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(|| {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                fallback.exists().then_some(fallback)
            });

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        Ok(config.with_command_override(env::var(GENERATOR_COMMAND_ENV).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        if let Some(dir) = path.parent() {
            config.generator.prompt_template = config
                .generator
                .prompt_template
                .take()
                .map(|template| dir.join(template));
        }

        Ok(config)
    }

    pub fn with_command_override(mut self, command: Option<String>) -> Self {
        if let Some(command) = command.filter(|value| !value.trim().is_empty()) {
            self.generator.command = Some(command);
        }
        self
    }
}
