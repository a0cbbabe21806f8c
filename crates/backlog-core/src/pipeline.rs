use backlog_parser::{DateLocalizer, ResponseParser};
use tracing::{debug, info, warn};

use crate::{
    assembler::assemble,
    error::{PipelineError, Result},
    generator::TextGenerator,
    normalizer::normalize,
    table::BacklogTable,
};

/// Turns raw backlog text into a grouped, sorted table by way of an injected
/// text generator.
///
/// The pipeline holds no per-run state; one instance can serve any number of
/// runs.
#[derive(Debug, Clone)]
pub struct BacklogPipeline<G> {
    generator: G,
    localizer: DateLocalizer,
}

impl<G: TextGenerator> BacklogPipeline<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            localizer: DateLocalizer::default(),
        }
    }

    pub fn with_localizer(mut self, localizer: DateLocalizer) -> Self {
        self.localizer = localizer;
        self
    }

    /// Runs the pipeline, folding every failure except an exhausted quota into
    /// `Ok(None)`. The folded error is logged.
    pub fn run(&self, raw_backlog: &str) -> Result<Option<BacklogTable>> {
        match self.try_run(raw_backlog) {
            Ok(table) => Ok(Some(table)),
            Err(err) if err.is_quota_exceeded() => Err(err),
            Err(err) => {
                warn!(error = %err, "backlog could not be processed");
                Ok(None)
            }
        }
    }

    /// Like [`BacklogPipeline::run`] but reports why a run produced no table.
    pub fn try_run(&self, raw_backlog: &str) -> Result<BacklogTable> {
        if raw_backlog.trim().is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        info!(
            input_bytes = raw_backlog.len(),
            "requesting epic grouping from generator"
        );
        let reply = self.generator.generate(raw_backlog)?;
        info!(reply_bytes = reply.len(), "generator reply received");

        self.process_response(&reply)
    }

    pub fn process_response(&self, reply: &str) -> Result<BacklogTable> {
        process_response(reply, &self.localizer)
    }
}

/// Parses, normalizes and assembles a model reply without calling a generator.
pub fn process_response(reply: &str, localizer: &DateLocalizer) -> Result<BacklogTable> {
    let raw_table = ResponseParser.parse(reply)?;
    debug!(
        rows = raw_table.len(),
        header_detected = raw_table.header_detected,
        "model reply parsed"
    );

    let records = normalize(&raw_table, localizer);
    let table = assemble(&records)?;
    info!(rows = table.len(), "backlog table assembled");
    Ok(table)
}

/// One-shot form of [`BacklogPipeline::run`] with the default localizer.
pub fn run<G: TextGenerator>(raw_backlog: &str, generator: G) -> Result<Option<BacklogTable>> {
    BacklogPipeline::new(generator).run(raw_backlog)
}
