// crates/meridian-cli/src/commands/mod.rs
//
// Command module declarations for the Meridian CLI, plus the shared
// transaction-wait helper every tx-bearing command uses.

pub mod apply;
pub mod check;
pub mod create;
pub mod node;
pub mod pool;
pub mod profile;
pub mod settings;
pub mod version;

use std::io::Write;

use console::style;

use meridian_client::wait_for_tx;
use meridian_core::Error;

use crate::AppContext;

/// Block until `tx` completes, rendering the animated pending line.
/// Ctrl-C aborts the wait.
pub(crate) async fn await_tx(ctx: &AppContext, tx: &str) -> Result<(), Error> {
    println!();

    let outcome = tokio::select! {
        res = wait_for_tx(&ctx.control, tx, &ctx.poll, |n| print_pending(tx, n)) => res,
        _ = tokio::signal::ctrl_c() => {
            Err(Error::Aborted("transaction wait interrupted".to_string()))
        }
    };
    outcome?;

    println!("\nTx: {}\t Status: {}", tx, style("Successful").green());
    Ok(())
}

fn print_pending(tx: &str, count: u32) {
    const FRAMES: [&str; 4] = ["   ", ".  ", ".. ", "..."];
    print!(
        "\rTx: {}\t Status: Pending{}",
        tx,
        FRAMES[count as usize % FRAMES.len()]
    );
    let _ = std::io::stdout().flush();
}
