//! Formatting preferences used when dumping a tree.
//!
//! Specifically, we try to find a cfgtree.toml, and if present we load settings from there.
//! The defaults reproduce the canonical format, which is what round-tripping relies on.

use crate::error::{Error, Result};
use facet::Facet;
use std::fs;
use std::path::Path;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "cfgtree.toml";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// Dump preferences loaded from cfgtree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "\t".to_string())]
    /// Whitespace written once per nesting level.
    pub indent: String,
    #[facet(default = "#".to_string())]
    /// Marker written before every comment line.
    pub comment_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            comment_prefix: "#".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from cfgtree.toml if present and valid.
    pub fn load() -> Self {
        Self::from_path(CONFIG_FILE).unwrap_or_default()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or holds
    /// settings that would produce unparsable dumps.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or fails validation.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config = facet_toml::from_str::<Self>(contents)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that dumps written with these settings load back.
    ///
    /// # Errors
    ///
    /// Returns an error if the indent holds anything but spaces and tabs, or
    /// the comment prefix does not start with `#`.
    pub fn validate(&self) -> Result<()> {
        if !self.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(Error::Config(format!(
                "indent {:?} must contain only spaces and tabs",
                self.indent
            )));
        }
        if !self.comment_prefix.starts_with('#') {
            return Err(Error::Config(format!(
                "comment prefix {:?} must start with '#'",
                self.comment_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
