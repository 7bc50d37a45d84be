//! Theme descriptor parsing and validation.
//!
//! A descriptor is parsed in two steps: first into an order-preserving raw
//! tree, then checked key by key against the allowed names. Any key outside
//! the allowed set is rejected with a message naming both the key and the
//! allowed names.

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::{ThemeError, ThemeResult};

/// Allowed top-level sections.
pub const SECTIONS: &[&str] = &["head", "body"];

/// Allowed keys inside `head`.
pub const HEAD_KEYS: &[&str] = &["styles", "fonts", "scripts", "html"];

/// Allowed keys inside `body`.
pub const BODY_KEYS: &[&str] = &["header", "footer"];

/// A file reference inside a `head` list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRef {
    /// Path relative to the descriptor's directory.
    pub file: String,
    /// Font family; only meaningful for `fonts`.
    #[serde(default)]
    pub family: Option<String>,
}

/// A validated theme descriptor, with paths still unresolved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// `head.styles`
    pub styles: Vec<FileRef>,
    /// `head.fonts`
    pub fonts: Vec<FileRef>,
    /// `head.scripts`
    pub scripts: Vec<FileRef>,
    /// `head.html`
    pub html: Vec<FileRef>,
    /// `body.header`
    pub header: Option<String>,
    /// `body.footer`
    pub footer: Option<String>,
}

/// Serialization format of a descriptor file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptorFormat {
    /// YAML, the default.
    Yaml,
    /// TOML, selected by a `.toml` extension.
    Toml,
}

impl DescriptorFormat {
    /// Pick the format from a file extension.
    #[must_use]
    pub fn for_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSection {
    Keys(IndexMap<String, RawValue>),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Path(String),
    Files(Vec<FileRef>),
    Other(IgnoredAny),
}

type RawDescriptor = IndexMap<String, RawSection>;

impl Descriptor {
    /// Load a descriptor from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or
    /// contains keys outside the allowed set.
    pub fn load(path: &Utf8Path) -> ThemeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, DescriptorFormat::for_path(path))
    }

    /// Parse and validate descriptor content.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or contains keys
    /// outside the allowed set.
    pub fn parse(content: &str, format: DescriptorFormat) -> ThemeResult<Self> {
        let raw: RawDescriptor = match format {
            DescriptorFormat::Yaml => serde_yaml::from_str(content)?,
            DescriptorFormat::Toml => toml::from_str(content)?,
        };

        let mut descriptor = Self::default();
        for (section, content) in raw {
            check_one_of("Unexpected section in theme config", SECTIONS, &section)?;
            let RawSection::Keys(keys) = content else {
                return Err(ThemeError::InvalidEntry {
                    section: "theme",
                    key: section,
                    expected: "a mapping",
                });
            };
            if section == "head" {
                descriptor.read_head(keys)?;
            } else {
                descriptor.read_body(keys)?;
            }
        }
        Ok(descriptor)
    }

    fn read_head(&mut self, keys: IndexMap<String, RawValue>) -> ThemeResult<()> {
        for (key, value) in keys {
            check_one_of("Unexpected key in 'head'", HEAD_KEYS, &key)?;
            let files = match value {
                RawValue::Files(files) => files,
                _ => {
                    return Err(ThemeError::InvalidEntry {
                        section: "head",
                        key,
                        expected: "a list of file entries",
                    })
                }
            };
            let target = match key.as_str() {
                "styles" => &mut self.styles,
                "fonts" => &mut self.fonts,
                "scripts" => &mut self.scripts,
                _ => &mut self.html,
            };
            target.extend(files);
        }
        Ok(())
    }

    fn read_body(&mut self, keys: IndexMap<String, RawValue>) -> ThemeResult<()> {
        for (key, value) in keys {
            check_one_of("Unexpected key in 'body'", BODY_KEYS, &key)?;
            let RawValue::Path(path) = value else {
                return Err(ThemeError::InvalidEntry {
                    section: "body",
                    key,
                    expected: "a file path",
                });
            };
            if key == "header" {
                self.header = Some(path);
            } else {
                self.footer = Some(path);
            }
        }
        Ok(())
    }
}

fn check_one_of(context: &'static str, expected: &'static [&'static str], actual: &str) -> ThemeResult<()> {
    if expected.contains(&actual) {
        Ok(())
    } else {
        Err(ThemeError::UnexpectedKey {
            context,
            expected,
            actual: actual.to_string(),
        })
    }
}
