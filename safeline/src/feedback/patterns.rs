//! Haptic pattern tables.
//!
//! Patterns are millisecond sequences alternating wait/buzz, starting with an
//! initial delay. Backends that cannot play patterns may collapse them to a
//! single buzz.

/// Short double tap played on ordinary interactions.
pub const NOTIFICATION: &[u64] = &[0, 100, 50, 100];

/// Three medium bursts played when an action is cancelled or fails.
pub const ERROR: &[u64] = &[0, 200, 100, 200, 100, 200];

/// Quick low-intensity tap pair for confirmed actions.
pub const SUCCESS: &[u64] = &[0, 50, 100, 50];

/// Morse "SOS" played on activation.
pub const SOS: &[u64] = &[
    0, 200, 100, 200, 100, 200, // S: 3 short
    500, 500, 100, 500, 100, 500, 100, 500, // O: 3 long
    500, 200, 100, 200, 100, 200, // S: 3 short
];
