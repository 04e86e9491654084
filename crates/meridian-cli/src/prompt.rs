// crates/meridian-cli/src/prompt.rs
//
// Interactive prompts. The keystore passphrase is always read hidden;
// everything else is plain text input with light validation.

use dialoguer::{Input, Password};

use meridian_client::CredentialSource;
use meridian_core::Error;

/// Hidden terminal prompt for the keystore passphrase.
///
/// This is the production `CredentialSource`; the client layer caches
/// the answer so one CLI invocation prompts at most once per credential.
pub struct PromptCredentialSource;

impl CredentialSource for PromptCredentialSource {
    fn passphrase(&self) -> Result<String, Error> {
        Password::new()
            .with_prompt("Keystore passphrase")
            .interact()
            .map_err(prompt_err)
    }
}

/// Ask for a new passphrase, typed twice.
pub fn new_passphrase() -> Result<String, Error> {
    Password::new()
        .with_prompt("Create a passphrase for your new account")
        .with_confirmation("Confirm your passphrase", "Passphrases do not match")
        .interact()
        .map_err(prompt_err)
}

/// Required free-text input.
pub fn input(message: &str) -> Result<String, Error> {
    Input::<String>::new()
        .with_prompt(message)
        .interact_text()
        .map_err(prompt_err)
}

/// Free-text input with an optional default (e.g. from the env file).
pub fn input_with_default(message: &str, default: Option<String>) -> Result<String, Error> {
    let mut prompt = Input::<String>::new().with_prompt(message);
    if let Some(value) = default {
        prompt = prompt.default(value);
    }
    prompt.interact_text().map_err(prompt_err)
}

/// Email input with a shape check.
pub fn email(message: &str) -> Result<String, Error> {
    Input::<String>::new()
        .with_prompt(message)
        .validate_with(|value: &String| -> Result<(), &str> {
            let domain_ok = value
                .rsplit_once('@')
                .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if domain_ok {
                Ok(())
            } else {
                Err("not a valid email address")
            }
        })
        .interact_text()
        .map_err(prompt_err)
}

fn prompt_err(e: dialoguer::Error) -> Error {
    Error::Io(e.to_string())
}
