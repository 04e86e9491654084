// crates/meridian-cli/src/commands/check.rs
//
// `meridian check` — check the status of a submitted pool application.

use meridian_core::Error;

use crate::commands::apply::saved_node_address;
use crate::{prompt, AppContext};

/// Run the check command.
pub async fn run(ctx: &AppContext) -> Result<(), Error> {
    let node_address = saved_node_address(ctx)?;

    let default_pool = ctx.env.get("environment", "poolAddress").map(str::to_string);
    let pool_address = prompt::input_with_default("Pool address", default_pool)?;

    let status = ctx
        .control
        .pool_application(&node_address, &pool_address)
        .await?;

    println!("Pool: {}\t Status: {}", pool_address, status);
    Ok(())
}
