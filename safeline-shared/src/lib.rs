//! Types shared across the Safeline crates.

pub mod errors;

pub use errors::{SafelineError, SafelineResult};
