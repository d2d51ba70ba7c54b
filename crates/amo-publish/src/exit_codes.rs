//! Exit codes for the CLI

use amo_publish_store::{exit_code, PublishError};

/// Success
pub const SUCCESS: i32 = 0;

/// Command line could not be parsed
pub const USAGE_ERROR: i32 = exit_code::INVALID_INPUT;

/// Exit code for an error bubbled up to `main`
///
/// Typed publish errors keep their own code wherever they sit in the chain;
/// everything else is unknown.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PublishError>())
        .map(PublishError::exit_code)
        .unwrap_or(exit_code::UNKNOWN)
}
