//! singlepage: single-page HTML documentation generator.
//!
//! Renders a documentation store into one self-contained HTML page, styled by
//! an ordered stack of theme layers.
//!
//! # Architecture
//!
//! The generation pipeline consists of:
//!
//! 1. **Themes** ([`singlepage_theme`]): load and compose theme layers
//! 2. **Model** ([`singlepage_model`]): extract the documented classes
//! 3. **Page** ([`page`]): assemble the document tree
//! 4. **HTML** ([`html`]): the tree and its serializer
//! 5. **Generators** ([`generator`]): named output formats
//! 6. **Build** ([`build`]): configuration and the end-to-end run
//! 7. **Shipped themes** ([`shipped`]): themes embedded in the binary
//!
//! # Usage
//!
//! ```ignore
//! use singlepage::build::{self, BuildConfig};
//!
//! let mut config = BuildConfig::new("store.json");
//! config.themes.push("themes/brand.yml".to_string());
//! build::run(&config)?;
//! ```

#![warn(missing_docs)]

pub mod build;
pub mod config;
pub mod generator;
pub mod html;
pub mod page;
pub mod shipped;

/// Re-export commonly used types.
pub use build::BuildConfig;
pub use config::{PolicyConfig, ProjectConfig};
pub use generator::{Generator, GeneratorOptions, GeneratorRegistry};
pub use page::{render_page, PageBuilder};
pub use shipped::ShippedThemes;
