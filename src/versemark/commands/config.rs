use crate::commands::{CmdMessage, CmdResult};
use crate::config::VersemarkConfig;
use crate::error::{Result, VersemarkError};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    Show,
    Get(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = VersemarkConfig::load(config_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::Show => {
            result.add_message(CmdMessage::info(format!("note-ext: {}", config.note_ext)));
            result.add_message(CmdMessage::info(format!(
                "include-topical: {}",
                config.include_topical
            )));
            result.add_message(CmdMessage::info(format!(
                "max-links-per-kind: {}",
                config.max_links_per_kind
            )));
            result.add_message(CmdMessage::info(format!(
                "min-confidence: {}",
                config.min_confidence
            )));
        }
        ConfigAction::Get(key) => {
            let value = match key.as_str() {
                "note-ext" => config.note_ext.clone(),
                "include-topical" => config.include_topical.to_string(),
                "max-links-per-kind" => config.max_links_per_kind.to_string(),
                "min-confidence" => config.min_confidence.to_string(),
                _ => return Err(VersemarkError::Api(format!("Unknown config key: {}", key))),
            };
            result.add_message(CmdMessage::info(value));
        }
        ConfigAction::Set(key, value) => {
            match key.as_str() {
                "note-ext" => config.set_note_ext(&value),
                "include-topical" => {
                    config.include_topical = value
                        .parse()
                        .map_err(|_| VersemarkError::Api(format!("Invalid bool: {}", value)))?
                }
                "max-links-per-kind" => {
                    config.max_links_per_kind = value
                        .parse()
                        .map_err(|_| VersemarkError::Api(format!("Invalid count: {}", value)))?
                }
                "min-confidence" => {
                    config.min_confidence = value
                        .parse()
                        .map_err(|_| VersemarkError::Api(format!("Invalid number: {}", value)))?
                }
                _ => return Err(VersemarkError::Api(format!("Unknown config key: {}", key))),
            }
            config.save(config_dir)?;
            result.add_message(CmdMessage::success(format!("Set {} = {}", key, value)));
        }
    }

    Ok(result)
}
