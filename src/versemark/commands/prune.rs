use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, VersemarkError};
use crate::reference::Reference;
use crate::store::CorpusStore;
use std::io::{self, Write};

/// Permanently remove entries from the corpus. This is the only way
/// entries leave the corpus; note files for pruned references become
/// orphaned on the next sync and are never deleted here.
pub fn run<S: CorpusStore>(
    store: &mut S,
    references: &[Reference],
    skip_confirm: bool,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let mut targets = Vec::new();
    for reference in references {
        match store.get(reference) {
            Ok(entry) => targets.push(entry),
            Err(VersemarkError::NotFound(_)) => {
                result.failed += 1;
                result.add_message(CmdMessage::error(format!(
                    "Not in corpus: {}",
                    reference
                )));
            }
            Err(e) => return Err(e),
        }
    }

    if targets.is_empty() {
        result.add_message(CmdMessage::info("No entries to prune."));
        return Ok(result);
    }

    if !skip_confirm {
        println!("This will permanently remove the following corpus entries:");
        for entry in &targets {
            println!("  {}", entry.reference);
        }
        print!("[Y] To remove: ");
        io::stdout().flush().map_err(VersemarkError::Io)?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(VersemarkError::Io)?;

        if input.trim() != "Y" {
            result.add_message(CmdMessage::info("Operation cancelled."));
            return Ok(result);
        }
    }

    for entry in targets {
        store.remove(&entry.reference)?;
        result.add_message(CmdMessage::success(format!("Pruned: {}", entry.reference)));
    }
    store.flush()?;

    Ok(result)
}
