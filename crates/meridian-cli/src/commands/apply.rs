// crates/meridian-cli/src/commands/apply.rs
//
// `meridian apply` — send the node's data (encrypted) to a pool owner
// as an application.

use meridian_core::Error;

use crate::commands::await_tx;
use crate::{output, prompt, AppContext};

/// Run the apply command.
pub async fn run(ctx: &mut AppContext) -> Result<(), Error> {
    let node_address = saved_node_address(ctx)?;

    let default_pool = ctx.env.get("environment", "poolAddress").map(str::to_string);
    let pool_address = prompt::input_with_default("Pool address", default_pool)?;

    let tx = ctx.control.apply_to_pool(&node_address, &pool_address).await?;
    await_tx(ctx, &tx).await?;

    // Remember the pool so `check` can offer it as the default.
    ctx.env.set("environment", "poolAddress", &pool_address);
    ctx.env.save(&ctx.env_path)?;

    output::success("Application sent to pool!");
    Ok(())
}

pub(crate) fn saved_node_address(ctx: &AppContext) -> Result<String, Error> {
    ctx.env
        .get("node", "address")
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Config("no node address saved; run `meridian create` first".to_string())
        })
}
