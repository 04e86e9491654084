// crates/meridian-cli/src/commands/version.rs
//
// `meridian version` — print client version information.

use meridian_core::Error;

/// Run the version command.
pub fn run() -> Result<(), Error> {
    println!("meridian {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
