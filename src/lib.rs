//! logsweep - Debug Logging Remover
//!
//! logsweep walks a source tree and strips calls to a logging marker
//! (`console.log` by default) from matching files, leaving similarly named
//! calls such as `console.error` in place.
//!
//! ## Layout
//!
//! - `classifier`: recognizes a call site inside one line
//! - `remover`: rewrites a whole file, following calls across lines by parenthesis balance
//! - `config`: embedded defaults (defaults.toml) merged with command-line overrides
//! - `scanner`: finds candidate files and writes rewritten content back

pub mod classifier;
pub mod config;
pub mod remover;
pub mod scanner;

// Re-export commonly used items
pub use classifier::{CallSite, LineClassifier};
pub use config::SweepConfig;
pub use remover::{find_matches, remove_all, MatchSpan, Removal};
pub use scanner::{
    collect_candidates, process_file, should_exclude_path, sweep, FileReport, ScanOptions,
    SweepResult,
};
