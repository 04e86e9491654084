// crates/meridian-cli/src/commands/settings.rs
//
// `meridian settings` — fetch and display the control daemon's settings.

use meridian_core::Error;

use crate::{output, AppContext};

/// Run the settings command.
pub async fn run(ctx: &AppContext) -> Result<(), Error> {
    let settings = ctx.control.settings().await?;
    println!("{}", output::format_json(&settings));
    Ok(())
}
