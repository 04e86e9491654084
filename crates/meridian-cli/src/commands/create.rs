// crates/meridian-cli/src/commands/create.rs
//
// `meridian create` — deploy a new node contract and set its data.
//
// Collects operator info, makes sure a keystore account and PGP pair
// exist, deploys the node contract, waits for the tx, then writes the
// node data and saves everything to the environment file.

use meridian_client::external_ip;
use meridian_core::{Error, NodeData};

use crate::commands::await_tx;
use crate::{output, prompt, AppContext};

/// Run the create command.
pub async fn run(ctx: &mut AppContext) -> Result<(), Error> {
    ensure_account(ctx).await?;

    // Operator identity for the node contract.
    let name = prompt::input("What is your name?")?;
    let email = prompt::email("What is your email?")?;

    let ip_address = match external_ip(&ctx.transport).await {
        Ok(ip) => ip,
        Err(e) => {
            tracing::debug!("external IP detection failed: {}", e);
            output::note("Could not detect this machine's external IP.");
            prompt::input("Public IP address")?
        }
    };

    let data = NodeData {
        name,
        email,
        ip_address,
        status: "active".to_string(),
    };

    // Persist the profile before any contract call so a failed tx can be
    // retried without retyping everything.
    ctx.env.set("node", "type", "node");
    ctx.env.set("node", "name", &data.name);
    ctx.env.set("node", "email", &data.email);
    ctx.env.set("node", "ipAddress", &data.ip_address);
    ctx.env.set("node", "status", &data.status);
    ctx.env.save(&ctx.env_path)?;

    // The PGP pair encrypts pool applications.
    ctx.control.create_pgp_pair(&data.name, &data.email).await?;

    let tx = ctx.control.create_node().await?;
    await_tx(ctx, &tx).await?;

    let node_address = ctx.control.node_address().await?;
    ctx.env.set("node", "address", &node_address);
    ctx.env.save(&ctx.env_path)?;
    output::success("Node created!");

    let tx = ctx.control.set_node_data(&node_address, &data).await?;
    await_tx(ctx, &tx).await?;
    output::success("Node data set!");

    println!();
    output::kv("Node Address:", &node_address);
    Ok(())
}

/// Make sure a keystore account exists, creating one if needed.
async fn ensure_account(ctx: &AppContext) -> Result<(), Error> {
    if let Some(address) = ctx.control.account_address().await? {
        tracing::debug!("keystore account present: {}", address);
        return Ok(());
    }

    output::note("No keystore account found; creating one.");
    let passphrase = prompt::new_passphrase()?;
    let address = ctx.control.create_account(&passphrase).await?;

    // The operator just typed this passphrase; don't re-prompt for it on
    // the very next write.
    ctx.control.cache_credential(&passphrase);

    output::kv("Account Address:", &address);
    Ok(())
}
