use crate::ingest::IngestReport;
use crate::sync::ChangeReport;

pub mod config;
pub mod generate;
pub mod ingest;
pub mod prune;
pub mod sync;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub reports: Vec<ChangeReport>,
    pub ingest: Option<IngestReport>,
    pub messages: Vec<CmdMessage>,
    /// Fatal per-item errors (invalid reference, missing entry). Drives the
    /// process exit code; warnings do not.
    pub failed: usize,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_reports(mut self, reports: Vec<ChangeReport>) -> Self {
        self.reports = reports;
        self
    }
}
