//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `fosa` exit codes.
//! The scheduler wrapping the nightly run branches on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success (including an empty eligible set)                 |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad arguments, unsupported source type)      |
//! | 3    | Schema fault (missing/duplicate column, corrupt blocklist) |
//! | 4    | Rule file does not parse or does not validate             |
//! | 5    | A source, the blocklist or the output could not be read/written |
//! | 6    | Latest export batch is incomplete                         |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `engine_exit_code` / `io_exit_code`

use fosa_engine::EngineError;
use fosa_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported input.
pub const EXIT_USAGE: u8 = 2;

/// A ledger export or the blocklist report does not have the expected shape.
/// Nothing is written.
pub const EXIT_SCHEMA: u8 = 3;

/// Rule file is not valid TOML or fails validation.
pub const EXIT_RULE_CONFIG: u8 = 4;

/// File could not be opened, read or written.
pub const EXIT_IO: u8 = 5;

/// `--latest-batch`: the newest export date has more or fewer files than its names announce.
pub const EXIT_BATCH: u8 = 6;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_RULE_CONFIG,
        e if e.is_schema_fault() => EXIT_SCHEMA,
        _ => EXIT_ERROR,
    }
}

/// Map an acquisition error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::BatchCount { .. } => EXIT_BATCH,
        IoError::UnsupportedFormat { .. } | IoError::BatchName { .. } => EXIT_USAGE,
        IoError::NoSheets { .. } => EXIT_SCHEMA,
        IoError::Open { .. } | IoError::Read { .. } | IoError::Write { .. } => EXIT_IO,
    }
}
