use crate::commands::{CmdMessage, CmdResult};
use crate::config::VersemarkConfig;
use crate::error::{Result, VersemarkError};
use crate::generate::generate;
use crate::reference::Reference;
use crate::resolver::resolve;
use crate::store::fs::write_atomic;
use crate::store::CorpusStore;
use crate::sync::{synchronize, FileStatus};
use std::fs;
use std::path::Path;

/// Resolve, generate, and write notes for every corpus entry under
/// `prefix` (or the whole corpus). Existing files are synchronized, not
/// overwritten, so annotations survive.
pub fn run<S: CorpusStore>(
    store: &S,
    config: &VersemarkConfig,
    prefix: Option<&Reference>,
    out_dir: &Path,
) -> Result<CmdResult> {
    let entries = store.list(prefix)?;
    let mut result = CmdResult::default();

    if entries.is_empty() {
        if let Some(prefix) = prefix {
            result.failed += 1;
            result.add_message(CmdMessage::error(format!(
                "No corpus entries under {}",
                prefix
            )));
        } else {
            result.add_message(CmdMessage::info("Corpus is empty, nothing to generate."));
        }
        return Ok(result);
    }

    if !out_dir.exists() {
        fs::create_dir_all(out_dir).map_err(VersemarkError::Io)?;
    }

    let resolver_config = config.resolver();
    for entry in entries {
        let resolution = resolve(store, &entry.reference, &resolver_config)?;
        for warning in resolution.warnings {
            result.add_message(CmdMessage::warning(warning));
        }

        let candidate = generate(&entry, &resolution.links);
        let path = out_dir.join(format!("{}{}", entry.reference, config.note_ext));
        // An unreadable existing note fails that item only; overwriting it
        // blind could destroy annotations.
        let existing = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(e) => {
                    result.failed += 1;
                    result.add_message(CmdMessage::error(format!(
                        "{}: cannot read note file: {}",
                        path.display(),
                        e
                    )));
                    continue;
                }
            }
        } else {
            None
        };

        let (output, report) = synchronize(existing.as_deref(), &candidate);
        for note in &report.unparsable {
            result.add_message(CmdMessage::warning(format!("{}: {}", entry.reference, note)));
        }
        match report.status {
            FileStatus::Created => {
                write_atomic(&path, &output)?;
                result.add_message(CmdMessage::success(format!("Created {}", path.display())));
            }
            FileStatus::Updated => {
                write_atomic(&path, &output)?;
                result.add_message(CmdMessage::success(format!("Updated {}", path.display())));
            }
            FileStatus::Unchanged => {
                result.add_message(CmdMessage::info(format!("Unchanged {}", path.display())));
            }
            // synchronize never orphans; that path belongs to the sync command
            FileStatus::Orphaned => {}
        }
        result.reports.push(report);
    }

    Ok(result)
}
