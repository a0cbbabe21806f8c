use std::fs;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result};
use backlog_core::{GenerationError, TextGenerator};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::{GeneratorConfig, GENERATOR_COMMAND_ENV};

pub const BACKLOG_PLACEHOLDER: &str = "{backlog}";

/// Runs an external program once per backlog: the prompt goes to its stdin and
/// its stdout is taken as the model reply.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
    template: Option<String>,
    quota_pattern: Option<Regex>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            template: None,
            quota_pattern: quota_pattern(&GeneratorConfig::default().quota_markers),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_quota_markers(mut self, markers: &[String]) -> Self {
        self.quota_pattern = quota_pattern(markers);
        self
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let program = config.command.clone().with_context(|| {
            format!(
                "no generator command configured; set generator.command in backlog.toml \
                 or {GENERATOR_COMMAND_ENV}"
            )
        })?;

        let mut generator = Self::new(program, config.args.clone())
            .with_quota_markers(&config.quota_markers);

        if let Some(path) = &config.prompt_template {
            let template = fs::read_to_string(path)
                .with_context(|| format!("failed to read prompt template {}", path.display()))?;
            if !template.contains(BACKLOG_PLACEHOLDER) {
                warn!(
                    template = %path.display(),
                    "prompt template lacks the backlog placeholder; backlog will not be sent"
                );
            }
            generator = generator.with_template(template);
        }

        Ok(generator)
    }

    pub fn render_prompt(&self, backlog: &str) -> String {
        match &self.template {
            Some(template) => template.replace(BACKLOG_PLACEHOLDER, backlog),
            None => backlog.to_string(),
        }
    }

    fn is_quota_failure(&self, stderr: &str) -> bool {
        self.quota_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(stderr))
    }
}

/// One case-insensitive pattern matching any marker as a whole word, so `429`
/// does not fire inside `74291`.
fn quota_pattern(markers: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = markers
        .iter()
        .map(|marker| marker.trim())
        .filter(|marker| !marker.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return None;
    }

    let pattern = format!(r"(?i)(?:^|\W)(?:{})(?:\W|$)", alternatives.join("|"));
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(error = %err, "quota markers could not be compiled; quota detection disabled");
            None
        }
    }
}

impl TextGenerator for CommandGenerator {
    fn generate(&self, backlog: &str) -> Result<String, GenerationError> {
        let prompt = self.render_prompt(backlog);
        debug!(
            program = %self.program,
            prompt_bytes = prompt.len(),
            "spawning generator command"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                GenerationError::failed(format!("failed to start '{}': {err}", self.program))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GenerationError::failed("generator stdin was not captured"))?;
        // Feed stdin from a separate thread so a large reply cannot fill the
        // stdout pipe while the prompt is still being written.
        let writer = thread::spawn(move || stdin.write_all(prompt.as_bytes()));

        let output = child.wait_with_output().map_err(|err| {
            GenerationError::failed(format!("failed waiting for '{}': {err}", self.program))
        })?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(err)) if err.kind() == ErrorKind::BrokenPipe => {
                debug!(
                    program = %self.program,
                    "generator closed stdin before reading the full prompt"
                );
            }
            Ok(Err(err)) => {
                return Err(GenerationError::failed(format!(
                    "failed to write prompt to '{}': {err}",
                    self.program
                )));
            }
            Err(_) => return Err(GenerationError::failed("prompt writer thread panicked")),
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let message = format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            );
            return Err(if self.is_quota_failure(&stderr) {
                GenerationError::quota_exceeded(message)
            } else {
                GenerationError::failed(message)
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
