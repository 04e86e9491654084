// crates/meridian-cli/src/commands/node.rs
//
// `meridian node {start, stop, status}` — control the local edge daemon
// over its JSON-RPC endpoint.

use clap::Subcommand;

use meridian_core::Error;

use crate::AppContext;

/// Edge daemon subcommands.
#[derive(Debug, Subcommand)]
pub enum NodeCmd {
    /// Start the edge daemon's networking server.
    Start,
    /// Stop the edge daemon's networking server.
    Stop,
    /// Query the edge daemon's serving state.
    Status,
}

/// Run the node subcommand.
pub async fn run(ctx: &AppContext, cmd: &NodeCmd) -> Result<(), Error> {
    let reply = match cmd {
        NodeCmd::Start => ctx.edge.start().await?,
        NodeCmd::Stop => ctx.edge.stop().await?,
        NodeCmd::Status => ctx.edge.status().await?,
    };

    println!("Edge Daemon:\t{}", reply);
    Ok(())
}
