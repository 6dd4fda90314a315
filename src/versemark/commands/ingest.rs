use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::ingest::{self, JsonFileSource};
use crate::store::CorpusStore;
use std::path::Path;

pub fn run<S: CorpusStore>(store: &mut S, path: &Path) -> Result<CmdResult> {
    let source = JsonFileSource::open(path)?;
    let report = ingest::ingest(store, source)?;

    let mut result = CmdResult::default();
    for warning in &report.warnings {
        result.add_message(CmdMessage::warning(warning.clone()));
    }
    result.add_message(CmdMessage::success(format!(
        "Ingested {} entries from {} ({} skipped)",
        report.succeeded,
        path.display(),
        report.failed
    )));
    result.failed = report.failed;
    result.ingest = Some(report);
    Ok(result)
}
