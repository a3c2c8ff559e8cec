//! Integration tests for tether-client.
//!
//! Tests are organized by functionality:
//! - `link_tests` - a pair of peer links wired by hand
//! - `relay_tests` - relay channel membership and presence
//! - `handshake_tests` - two sessions negotiating over an in-process relay
//! - `sync_tests` - controls replication and transport fallback

pub mod link_tests;
pub mod sync_tests;

use tracing::Level;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}
