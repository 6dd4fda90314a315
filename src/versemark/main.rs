use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::process::ExitCode;
use versemark::api::{CmdMessage, CmdResult, ConfigAction, MessageLevel, VersemarkApi};
use versemark::commands;
use versemark::config::VersemarkConfig;
use versemark::error::Result;
use versemark::store::fs::FileCorpus;

mod args;
use args::{Cli, Commands};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(true)` only if no per-item fatal errors occurred.
fn run() -> Result<bool> {
    let cli = Cli::parse();
    let corpus_dir = corpus_dir(&cli);

    // Config reads/writes go straight to the corpus dir, no store needed.
    if let Commands::Config { key, value } = &cli.command {
        let action = match (key, value) {
            (None, _) => ConfigAction::Show,
            (Some(k), None) => ConfigAction::Get(k.clone()),
            (Some(k), Some(v)) => ConfigAction::Set(k.clone(), v.clone()),
        };
        let result = commands::config::run(&corpus_dir, action)?;
        return Ok(finish(result));
    }

    let config = VersemarkConfig::load(&corpus_dir)?;
    let store = FileCorpus::open(&corpus_dir)?;
    let mut api = VersemarkApi::new(store, config);

    let result = match cli.command {
        Commands::Ingest { file } => api.ingest(&file)?,
        Commands::Generate { dir, prefix } => api.generate(prefix.as_deref(), &dir)?,
        Commands::Sync { dir } => api.sync(&dir)?,
        Commands::Prune { references, yes } => api.prune(&references, yes)?,
        Commands::Config { .. } => unreachable!("handled above"),
    };

    Ok(finish(result))
}

fn corpus_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.corpus {
        return dir.clone();
    }
    let proj_dirs = ProjectDirs::from("com", "versemark", "versemark")
        .expect("Could not determine data dir");
    proj_dirs.data_dir().join("corpus")
}

fn finish(result: CmdResult) -> bool {
    print_messages(&result.messages);
    result.failed == 0
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}
