//! # Versemark Architecture
//!
//! Versemark is a **UI-agnostic study-note library** with a CLI client. It
//! keeps a canonical JSON corpus of scriptures and conference talks, renders
//! markdown note files from it, and can regenerate those files any number of
//! times without destroying annotations the user has added by hand.
//!
//! ## The Layers
//!
//! ```text
//! CLI (main.rs, args.rs)        argument parsing, colored output, exit codes
//!          │
//! API (api.rs)                  thin facade, input normalization
//!          │
//! Commands (commands/*.rs)      business logic, structured CmdResult values
//!          │
//! Core                          reference / model / store / resolver /
//!                               generate / notefile / sync / ingest
//! ```
//!
//! From `api.rs` inward, code never writes to stdout or assumes a terminal.
//! The only filesystem writers are the corpus store and the generate/sync
//! commands, and every write goes through write-to-temp-then-rename.
//!
//! ## The Regeneration Contract
//!
//! The pipeline per reference is: corpus entry → resolved links → generated
//! candidate note → synchronized against whatever is on disk. The
//! synchronizer ([`sync`]) keys annotation regions by **identity**
//! (reference + slot kind), not by file position, so user content survives
//! arbitrary structural churn. Anything it cannot positively account for is
//! flagged, never silently discarded.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`reference`]: Hierarchical reference identifiers and their ordering
//! - [`model`]: Core data types (`CorpusEntry`, `ResourceLink`)
//! - [`store`]: Corpus storage abstraction and implementations
//! - [`resolver`]: Deterministic cross-reference and topical link derivation
//! - [`notefile`]: Note file model, slot markers, parsing
//! - [`generate`]: Pure candidate note generation
//! - [`sync`]: The annotation-preserving merge engine
//! - [`ingest`]: Ingestion adapter boundary and batch ingest
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod generate;
pub mod ingest;
pub mod model;
pub mod notefile;
pub mod reference;
pub mod resolver;
pub mod store;
pub mod sync;
