//! # API Facade
//!
//! Thin facade over the command layer and the single entry point for all
//! versemark operations. It dispatches to `commands/*`, normalizes inputs
//! (reference strings to [`Reference`]s), and returns structured
//! `Result<CmdResult>` values. No stdout, no formatting; that belongs to
//! the CLI layer.
//!
//! `VersemarkApi<S: CorpusStore>` is generic over the storage backend:
//! `FileCorpus` in production, `InMemoryCorpus` in tests.

use crate::commands;
use crate::config::VersemarkConfig;
use crate::error::Result;
use crate::reference::Reference;
use crate::store::CorpusStore;
use std::path::Path;

pub struct VersemarkApi<S: CorpusStore> {
    store: S,
    config: VersemarkConfig,
}

impl<S: CorpusStore> VersemarkApi<S> {
    pub fn new(store: S, config: VersemarkConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &VersemarkConfig {
        &self.config
    }

    pub fn ingest(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::ingest::run(&mut self.store, path)
    }

    pub fn generate(
        &self,
        prefix: Option<&str>,
        out_dir: &Path,
    ) -> Result<commands::CmdResult> {
        let prefix = prefix.map(str::parse::<Reference>).transpose()?;
        commands::generate::run(&self.store, &self.config, prefix.as_ref(), out_dir)
    }

    pub fn sync(&self, dir: &Path) -> Result<commands::CmdResult> {
        commands::sync::run(&self.store, &self.config, dir)
    }

    pub fn prune<I: AsRef<str>>(
        &mut self,
        references: &[I],
        skip_confirm: bool,
    ) -> Result<commands::CmdResult> {
        let references = parse_references(references)?;
        commands::prune::run(&mut self.store, &references, skip_confirm)
    }
}

fn parse_references<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<Reference>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
