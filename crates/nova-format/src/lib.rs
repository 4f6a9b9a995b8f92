//! Layout settings and the indentation-aware output sink used when emitting
//! Java source.
//!
//! Generated code is never re-flowed: the only layout decisions are the
//! indentation unit and the line terminator. [`CodeWriter`] applies both while
//! streaming text into any [`std::fmt::Write`] sink.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod writer;

pub use writer::CodeWriter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Columns per nesting level. Ignored for [`IndentStyle::Tabs`].
    #[serde(default = "FormatConfig::default_indent_width")]
    pub indent_width: usize,
    #[serde(default)]
    pub indent_style: IndentStyle,
    #[serde(default)]
    pub newline: NewlineStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    #[default]
    Spaces,
    Tabs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlineStyle {
    #[default]
    Lf,
    CrLf,
}

impl NewlineStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::CrLf => "\r\n",
        }
    }
}

impl FormatConfig {
    fn default_indent_width() -> usize {
        4
    }

    /// Parse a `[format]`-style TOML table body.
    ///
    /// ```toml
    /// indent_width = 2
    /// indent_style = "spaces"
    /// newline = "crlf"
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig = toml::from_str(text)?;
        tracing::debug!(
            target = "nova.format",
            indent_width = config.indent_width,
            indent_style = ?config.indent_style,
            newline = ?config.newline,
            "loaded format config"
        );
        Ok(config)
    }

    /// The text for one nesting level.
    #[must_use]
    pub fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Spaces => " ".repeat(self.indent_width),
            IndentStyle::Tabs => "\t".to_owned(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: Self::default_indent_width(),
            indent_style: IndentStyle::Spaces,
            newline: NewlineStyle::Lf,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep only the message; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(FormatConfig::from_toml_str("").unwrap(), FormatConfig::default());
    }

    #[test]
    fn indent_unit_follows_style() {
        let mut config = FormatConfig {
            indent_width: 2,
            ..FormatConfig::default()
        };
        assert_eq!(config.indent_unit(), "  ");
        config.indent_style = IndentStyle::Tabs;
        assert_eq!(config.indent_unit(), "\t");
    }
}
