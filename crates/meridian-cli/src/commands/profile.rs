// crates/meridian-cli/src/commands/profile.rs
//
// `meridian profile` — show the locally saved node profile.

use tabled::Tabled;

use meridian_core::Error;

use crate::{output, AppContext};

#[derive(Tabled)]
struct ProfileRow {
    field: String,
    value: String,
}

/// Run the profile command.
pub fn run(ctx: &AppContext) -> Result<(), Error> {
    let Some(section) = ctx.env.section("node") else {
        return Err(Error::Config(
            "no node profile saved; run `meridian create` first".to_string(),
        ));
    };

    let rows: Vec<ProfileRow> = section
        .iter()
        .map(|(field, value)| ProfileRow {
            field: field.clone(),
            value: value.clone(),
        })
        .collect();

    println!("{}", output::format_table(&rows));
    Ok(())
}
