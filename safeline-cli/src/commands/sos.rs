//! Hold-to-confirm SOS trigger.
//!
//! Simulates the press-and-hold gesture: `safeline sos` holds through the
//! countdown and issues the (dry-run) fan-out; `--release-after-ms` lets go
//! early to exercise the cancel path.

use std::time::Duration;

use clap::Args;
use safeline::SosPhase;

use crate::cli::GlobalFlags;

#[derive(Args, Debug)]
pub struct SosArgs {
    /// Release the button after this many milliseconds instead of holding
    /// through the countdown
    #[arg(long, value_name = "MS")]
    pub release_after_ms: Option<u64>,
}

pub async fn execute(args: SosArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let sos = rt.sos().clone();
    let mut rx = sos.subscribe();

    println!("Hold for 3 seconds... (release cancels)");
    sos.press();

    if let Some(ms) = args.release_after_ms {
        let sos = sos.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            sos.release();
        });
    }

    loop {
        rx.changed().await?;
        match *rx.borrow_and_update() {
            SosPhase::Counting(n) => println!("  {}", n),
            SosPhase::Activated => {
                println!("SOS Activated!");
                println!("Emergency alert has been sent to your contacts.");
                break;
            }
            SosPhase::Idle => {
                println!("Countdown cancelled, no alert sent.");
                return Ok(());
            }
        }
    }

    // Give the spawned fan-out tasks a moment to log their outcomes before
    // the process exits; dismissing only resets the UI phase.
    tokio::time::sleep(Duration::from_millis(250)).await;
    sos.dismiss();
    println!("Alert dismissed.");

    Ok(())
}
