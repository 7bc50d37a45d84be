//! Themes compiled into the binary.
//!
//! The loader works on files, so the embedded themes are unpacked into a
//! temporary directory that lives as long as the [`ShippedThemes`] value.

use std::fs;

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use singlepage_theme::ThemeCatalog;
use tempfile::TempDir;
use tracing::debug;

/// Embedded theme files, by path relative to the themes directory.
const FILES: &[(&str, &str)] = &[
    ("default.yml", include_str!("../themes/default.yml")),
    ("default/_palette.scss", include_str!("../themes/default/_palette.scss")),
    ("default/style.scss", include_str!("../themes/default/style.scss")),
    ("default/toc.js", include_str!("../themes/default/toc.js")),
    ("default/footer.html", include_str!("../themes/default/footer.html")),
    ("dark.yml", include_str!("../themes/dark.yml")),
    ("dark/dark.css", include_str!("../themes/dark/dark.css")),
];

/// The shipped themes, unpacked on disk.
#[derive(Debug)]
pub struct ShippedThemes {
    _temp: TempDir,
    dir: Utf8PathBuf,
}

impl ShippedThemes {
    /// Unpack the embedded themes into a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or a file cannot be written.
    pub fn unpack() -> Result<Self> {
        let temp = TempDir::new().context("failed to create directory for shipped themes")?;
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow!("non-UTF-8 temporary directory {}", path.display()))?;

        for (name, content) in FILES {
            let path = dir.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("failed to create {parent}"))?;
            }
            fs::write(&path, content).with_context(|| format!("failed to write {path}"))?;
        }
        debug!(dir = %dir, files = FILES.len(), "unpacked shipped themes");

        Ok(Self { _temp: temp, dir })
    }

    /// Directory holding the unpacked themes.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Catalog over the unpacked themes.
    pub fn catalog(&self) -> ThemeCatalog {
        ThemeCatalog::new(self.dir.clone())
    }
}
