//! Shared constants for end-to-end tests.
#![allow(dead_code)]

/// How long to wait for a spawned server to answer its health check.
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval while waiting for a spawned server.
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Lyrics the mock upstream returns unless a test scripts otherwise.
pub const SAMPLE_LYRICS: &str = "[Title: Golden Hour]
[Verse 1]
Sunset paints the harbor gold
Every story yet untold
[Chorus]
Love will light the way back home
[Verse 2]
Morning finds us not alone";
