// crates/meridian-cli/src/config.rs
//
// The persisted environment file (default `env.toml`): a two-level map of
// sections to key/value strings. Read-modify-write with no locking; the
// last writer wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use meridian_core::Error;

type SectionMap = BTreeMap<String, BTreeMap<String, String>>;

/// In-memory view of the environment file.
///
/// Sections in use: `[node]` (type, name, email, ipAddress, status,
/// address) and `[environment]` (controlUrl, gatewayUrl, edgeUrl,
/// poolAddress).
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    sections: SectionMap,
}

impl EnvFile {
    /// Load the file at `path`.
    ///
    /// A missing file is an empty environment (first run); unparseable
    /// TOML is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let sections: SectionMap = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Self { sections })
    }

    /// Read one value.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }

    /// Borrow a whole section.
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    /// Set one value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Rewrite the whole file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let contents =
            toml::to_string_pretty(&self.sections).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }
}
