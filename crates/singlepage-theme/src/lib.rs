//! Theme layers and theme composition for singlepage.
//!
//! A theme is described by one or more descriptor files. Each descriptor is
//! loaded into a [`ThemeLayer`] with every file reference resolved relative to
//! the descriptor itself, and the layers are folded into a single immutable
//! [`ComposedTheme`] by a [`ThemeBuilder`].
//!
//! # Descriptor Format
//!
//! Descriptors are YAML (or TOML when the file ends in `.toml`):
//!
//! ```yaml
//! head:
//!   styles:
//!     - file: default/style.scss
//!   fonts:
//!     - file: default/Inter.woff2
//!       family: Inter
//!   scripts:
//!     - file: default/toc.js
//!   html:
//!     - file: default/meta.html
//! body:
//!   header: default/header.html
//!   footer: default/footer.html
//! ```
//!
//! Head lists are appended across layers in order; `body` entries are
//! overwritten by later layers. Stylesheets written in Sass or SCSS are
//! compiled to CSS once all layers are merged.

#![warn(missing_docs)]

pub mod catalog;
pub mod compose;
pub mod descriptor;
pub mod layer;
pub mod sass;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

pub use catalog::ThemeCatalog;
pub use compose::{compose, ComposedTheme, ThemeBuilder};
pub use descriptor::{Descriptor, DescriptorFormat, FileRef};
pub use layer::{Asset, BodyFragments, Font, Fragment, HeadAssets, ThemeLayer, ThemeLoader};

/// Coarse classification of a [`ThemeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The descriptor is malformed or contains keys outside the allowed set.
    ConfigValidation,
    /// A descriptor or asset file could not be read.
    ResourceLoad,
    /// A preprocessor stylesheet failed to compile.
    Compilation,
}

impl ErrorKind {
    /// Get a human-readable name for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConfigValidation => "config_validation",
            Self::ResourceLoad => "resource_load",
            Self::Compilation => "compilation",
        }
    }
}

/// Errors that can occur while loading or composing a theme.
#[derive(Debug, Error)]
pub enum ThemeError {
    /// A section or key outside the allowed set.
    #[error("{context}: got '{actual}', expected one of: {}", quote_all(.expected))]
    UnexpectedKey {
        /// What was being validated.
        context: &'static str,
        /// The allowed names.
        expected: &'static [&'static str],
        /// The name found in the descriptor.
        actual: String,
    },

    /// A known key whose value has the wrong shape.
    #[error("invalid value for '{section}.{key}': expected {expected}")]
    InvalidEntry {
        /// The enclosing section.
        section: &'static str,
        /// The offending key.
        key: String,
        /// Description of the accepted shape.
        expected: &'static str,
    },

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A descriptor or asset file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A path on disk is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// A themes directory could not be listed.
    #[error("failed to list themes in {dir}")]
    Catalog {
        /// The themes directory.
        dir: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: walkdir::Error,
    },

    /// A preprocessor stylesheet failed to compile.
    #[error("failed to compile {path}: {message}")]
    Compile {
        /// The stylesheet source.
        path: Utf8PathBuf,
        /// The compiler's diagnostic.
        message: String,
    },

    /// Any failure attributed to one descriptor.
    ///
    /// The message names only the descriptor. The cause is available through
    /// [`std::error::Error::source`] (or [`ThemeError::root`]), so callers
    /// must print the whole chain, e.g. with `{:#}` on an `anyhow::Error`.
    #[error("can't load theme - {descriptor}")]
    Layer {
        /// The descriptor that was being processed.
        descriptor: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: Box<ThemeError>,
    },
}

impl ThemeError {
    /// Classify this error. Wrapped errors report the kind of their cause.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedKey { .. }
            | Self::InvalidEntry { .. }
            | Self::Yaml(_)
            | Self::Toml(_) => ErrorKind::ConfigValidation,
            Self::Read { .. } | Self::NonUtf8Path(_) | Self::Catalog { .. } => {
                ErrorKind::ResourceLoad
            }
            Self::Compile { .. } => ErrorKind::Compilation,
            Self::Layer { source, .. } => source.kind(),
        }
    }

    /// The innermost error, skipping any descriptor wrappers.
    #[must_use]
    pub fn root(&self) -> &ThemeError {
        match self {
            Self::Layer { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn in_layer(self, descriptor: &Utf8Path) -> Self {
        Self::Layer {
            descriptor: descriptor.to_path_buf(),
            source: Box::new(self),
        }
    }
}

fn quote_all(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

/// Output style for compiled stylesheets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleOutput {
    /// One declaration per line.
    #[default]
    Expanded,
    /// Minified output.
    Compressed,
}

/// Options shared by the loader and the composer.
#[derive(Clone, Debug, Default)]
pub struct ThemeOptions {
    /// Prefix joined onto asset names to form their public URLs.
    pub url_prefix: String,
    /// Output style for compiled stylesheets.
    pub style: StyleOutput,
}

impl ThemeOptions {
    /// Create options with an empty URL prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL prefix.
    #[must_use]
    pub fn url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Set the stylesheet output style.
    #[must_use]
    pub fn style(mut self, style: StyleOutput) -> Self {
        self.style = style;
        self
    }

    /// Public URL for an asset with the given destination name.
    ///
    /// Exactly one `/` separates a non-empty prefix from the name.
    #[must_use]
    pub fn asset_url(&self, name: &str) -> String {
        if self.url_prefix.is_empty() {
            return name.to_string();
        }
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), name)
    }
}

/// Make `path` absolute against the current working directory.
pub(crate) fn absolutize(path: &Utf8Path) -> ThemeResult<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| ThemeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(ThemeError::NonUtf8Path)?;
    Ok(cwd.join(path))
}
