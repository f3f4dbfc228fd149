//! Tracing subscriber setup for hosts embedding the forms.
//!
//! ## Environment Variables
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=tally_core=trace` - Trace the pricing core only
//! - Default: INFO level, DEBUG for the tally crates

use tracing_subscriber::EnvFilter;

use crate::error::{FormsError, FormsResult};

const DEFAULT_FILTER: &str = "info,tally=debug";

/// Installs the global fmt subscriber.
///
/// Fails if the host already installed one.
pub fn init_tracing() -> FormsResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| FormsError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // Whichever call runs first wins; any later one must error, not panic.
        let _ = init_tracing();
        assert!(matches!(init_tracing(), Err(FormsError::Telemetry(_))));
    }
}
