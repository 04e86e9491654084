// crates/meridian-cli/src/commands/pool.rs
//
// `meridian pool {owned, applications, set-status}` — pool-owner
// operations: list owned pools and manage node applications.

use clap::Subcommand;
use tabled::Tabled;

use meridian_core::Error;

use crate::commands::await_tx;
use crate::{output, AppContext};

/// Pool-owner subcommands.
#[derive(Debug, Subcommand)]
pub enum PoolCmd {
    /// List pools owned by the keystore account.
    Owned,
    /// List node applications to an owned pool.
    Applications {
        /// Pool contract address.
        pool: String,
        /// Application status to filter by (pending, approved, rejected).
        #[arg(long, default_value = "pending")]
        status: String,
    },
    /// Accept or reject a node's application to an owned pool.
    SetStatus {
        /// Pool contract address.
        pool: String,
        /// Applicant node address.
        node: String,
        /// New status: approved or rejected.
        status: String,
    },
}

#[derive(Tabled)]
struct ApplicationRow {
    node: String,
    status: String,
}

/// Run the pool subcommand.
pub async fn run(ctx: &AppContext, cmd: &PoolCmd) -> Result<(), Error> {
    match cmd {
        PoolCmd::Owned => {
            let pools = ctx.control.owned_pools().await?;
            if pools.is_empty() {
                output::note("No owned pools found.");
                return Ok(());
            }
            for pool in pools {
                println!("{}", pool);
            }
        }
        PoolCmd::Applications { pool, status } => {
            let nodes = ctx.control.pool_applications(pool, status).await?;
            if nodes.is_empty() {
                output::note(&format!("No {} applications for {}.", status, pool));
                return Ok(());
            }
            let rows: Vec<ApplicationRow> = nodes
                .into_iter()
                .map(|node| ApplicationRow {
                    node,
                    status: status.clone(),
                })
                .collect();
            println!("{}", output::format_table(&rows));
        }
        PoolCmd::SetStatus { pool, node, status } => {
            let tx = ctx
                .control
                .set_application_status(pool, node, status)
                .await?;
            await_tx(ctx, &tx).await?;
            output::success(&format!("Application for {} marked {}.", node, status));
        }
    }

    Ok(())
}
