use crate::commands::{CmdMessage, CmdResult};
use crate::config::VersemarkConfig;
use crate::error::{Result, VersemarkError};
use crate::generate::generate;
use crate::reference::Reference;
use crate::resolver::resolve;
use crate::store::fs::write_atomic;
use crate::store::CorpusStore;
use crate::sync::{synchronize, synchronize_orphan, FileStatus};
use std::fs;
use std::path::Path;

/// Re-synchronize every note file in `dir` against the current corpus.
/// Files whose reference left the corpus are flagged as orphaned and left
/// on disk untouched.
pub fn run<S: CorpusStore>(store: &S, config: &VersemarkConfig, dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if !dir.exists() {
        result.failed += 1;
        result.add_message(CmdMessage::error(format!(
            "Note directory {} does not exist",
            dir.display()
        )));
        return Ok(result);
    }

    // Deterministic processing order regardless of readdir order.
    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(VersemarkError::Io)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .to_string_lossy()
                    .ends_with(config.note_ext.as_str())
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No {} files in {}",
            config.note_ext,
            dir.display()
        )));
        return Ok(result);
    }

    let resolver_config = config.resolver();
    for path in paths {
        let stem = match path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| name.strip_suffix(config.note_ext.as_str()))
        {
            Some(stem) => stem.to_string(),
            None => continue,
        };
        let reference: Reference = match stem.parse() {
            Ok(reference) => reference,
            Err(_) => {
                result.failed += 1;
                result.add_message(CmdMessage::error(format!(
                    "{}: file name is not a valid reference",
                    path.display()
                )));
                continue;
            }
        };

        // An unreadable note fails that item only; the batch keeps going.
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                result.failed += 1;
                result.add_message(CmdMessage::error(format!(
                    "{}: cannot read note file: {}",
                    path.display(),
                    e
                )));
                continue;
            }
        };

        match store.get(&reference) {
            Ok(entry) => {
                let resolution = resolve(store, &reference, &resolver_config)?;
                for warning in resolution.warnings {
                    result.add_message(CmdMessage::warning(warning));
                }
                let candidate = generate(&entry, &resolution.links);
                let (output, report) = synchronize(Some(&contents), &candidate);
                for note in &report.unparsable {
                    result.add_message(CmdMessage::warning(format!("{}: {}", reference, note)));
                }
                match report.status {
                    FileStatus::Updated => {
                        write_atomic(&path, &output)?;
                        result
                            .add_message(CmdMessage::success(format!("Updated {}", path.display())));
                    }
                    FileStatus::Unchanged => {
                        result
                            .add_message(CmdMessage::info(format!("Unchanged {}", path.display())));
                    }
                    FileStatus::Created | FileStatus::Orphaned => {}
                }
                result.reports.push(report);
            }
            Err(VersemarkError::NotFound(_)) => {
                let report = synchronize_orphan(&reference, &contents);
                result.add_message(CmdMessage::warning(format!(
                    "Orphaned {} (no corpus entry; file kept)",
                    path.display()
                )));
                result.reports.push(report);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::generate as generate_cmd;
    use crate::model::{CorpusEntry, EntryKind};
    use crate::store::memory::InMemoryCorpus;
    use crate::store::CorpusStore;

    fn entry(reference: &str, text: &str) -> CorpusEntry {
        CorpusEntry::new(reference.parse().unwrap(), EntryKind::Scripture, text)
    }

    #[test]
    fn preserves_user_edits_after_a_corpus_change() {
        let mut store = InMemoryCorpus::new();
        store.upsert(entry("alma.32.21", "faith is not...")).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let config = VersemarkConfig::default();
        generate_cmd::run(&store, &config, None, tmp.path()).unwrap();

        // User adds a footnote into the slot
        let path = tmp.path().join("alma.32.21.md");
        let edited = fs::read_to_string(&path).unwrap().replace(
            "%%vmark end alma.32.21 footnotes%%",
            "a: compare Hebrews 11:1\n%%vmark end alma.32.21 footnotes%%",
        );
        fs::write(&path, &edited).unwrap();

        // Corpus text fix, then sync
        store
            .upsert(entry("alma.32.21", "faith is not to have a perfect knowledge"))
            .unwrap();
        let result = run(&store, &config, tmp.path()).unwrap();

        let merged = fs::read_to_string(&path).unwrap();
        assert!(merged.contains("a: compare Hebrews 11:1"));
        assert!(merged.contains("faith is not to have a perfect knowledge"));
        assert_eq!(result.failed, 0);
        assert_eq!(result.reports[0].status, FileStatus::Updated);
    }

    #[test]
    fn orphaned_file_is_kept_on_disk() {
        let mut store = InMemoryCorpus::new();
        store.upsert(entry("alma.32.21", "faith")).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let config = VersemarkConfig::default();
        generate_cmd::run(&store, &config, None, tmp.path()).unwrap();

        store.remove(&"alma.32.21".parse().unwrap()).unwrap();
        let before = fs::read_to_string(tmp.path().join("alma.32.21.md")).unwrap();
        let result = run(&store, &config, tmp.path()).unwrap();
        let after = fs::read_to_string(tmp.path().join("alma.32.21.md")).unwrap();

        assert_eq!(before, after);
        assert_eq!(result.reports[0].status, FileStatus::Orphaned);
        assert_eq!(result.failed, 0);
    }

    #[test]
    fn bad_file_name_is_fatal_for_that_item_only() {
        let mut store = InMemoryCorpus::new();
        store.upsert(entry("alma.32.21", "faith")).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let config = VersemarkConfig::default();
        generate_cmd::run(&store, &config, None, tmp.path()).unwrap();
        fs::write(tmp.path().join("Not A Ref.md"), "junk").unwrap();

        let result = run(&store, &config, tmp.path()).unwrap();
        assert_eq!(result.failed, 1);
        // The valid file was still processed
        assert_eq!(result.reports.len(), 1);
    }

    #[test]
    fn unreadable_note_fails_that_item_only() {
        let mut store = InMemoryCorpus::new();
        store.upsert(entry("alma.32.21", "faith")).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let config = VersemarkConfig::default();
        generate_cmd::run(&store, &config, None, tmp.path()).unwrap();
        // Not valid UTF-8, so read_to_string fails on this one file.
        fs::write(tmp.path().join("aa.1.1.md"), [0xff, 0xfe, 0xfd]).unwrap();

        let result = run(&store, &config, tmp.path()).unwrap();
        assert_eq!(result.failed, 1);
        // The healthy file was still processed
        assert_eq!(result.reports.len(), 1);
    }

    #[test]
    fn doubled_extension_is_not_mistaken_for_the_bare_reference() {
        let mut store = InMemoryCorpus::new();
        store.upsert(entry("alma.32.21", "faith")).unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let config = VersemarkConfig::default();
        generate_cmd::run(&store, &config, None, tmp.path()).unwrap();

        // A stray copy with a doubled extension must not be synced as
        // alma.32.21; its stem is the distinct reference alma.32.21.md.
        let stray = tmp.path().join("alma.32.21.md.md");
        fs::write(&stray, "user notes\n").unwrap();

        let result = run(&store, &config, tmp.path()).unwrap();
        assert_eq!(result.reports.len(), 2);
        assert_eq!(result.reports[1].status, FileStatus::Orphaned);
        assert_eq!(fs::read_to_string(&stray).unwrap(), "user notes\n");
    }

    #[test]
    fn missing_directory_is_reported() {
        let store = InMemoryCorpus::new();
        let result = run(
            &store,
            &VersemarkConfig::default(),
            Path::new("/nonexistent/notes"),
        )
        .unwrap();
        assert_eq!(result.failed, 1);
    }
}
