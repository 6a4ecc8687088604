//! Console-backed feedback port.
//!
//! Stands in for the device vibrator: semantic events become short stderr
//! lines plus a terminal bell, so a countdown is still felt when running
//! headless.

use std::io::Write;

use safeline::feedback::patterns;
use safeline::{Feedback, SafelineResult};

pub struct ConsoleFeedback;

impl ConsoleFeedback {
    fn emit(&self, label: &str) -> SafelineResult<()> {
        let mut stderr = std::io::stderr().lock();
        // \x07 rings the terminal bell where supported
        write!(stderr, "\x07")?;
        writeln!(stderr, "[feedback] {}", label)?;
        Ok(())
    }
}

impl Feedback for ConsoleFeedback {
    fn generic(&self, pattern: &[u64]) -> SafelineResult<()> {
        let label = match pattern {
            p if p == patterns::NOTIFICATION => "notify",
            p if p == patterns::ERROR => "error",
            p if p == patterns::SUCCESS => "success",
            p if p == patterns::SOS => "SOS",
            _ => "pattern",
        };
        self.emit(label)
    }

    fn stop(&self) -> SafelineResult<()> {
        self.emit("stop")
    }
}
