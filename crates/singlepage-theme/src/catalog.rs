//! Named themes stored in a themes directory.

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;

use crate::{absolutize, ThemeError, ThemeResult};

const DESCRIPTOR_EXTENSIONS: &[&str] = &["yml", "yaml", "toml"];

/// A directory of theme descriptors, addressed by file stem.
#[derive(Clone, Debug)]
pub struct ThemeCatalog {
    dir: Utf8PathBuf,
}

impl ThemeCatalog {
    /// Create a catalog over `dir`.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The themes directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Names of all descriptors directly inside the directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> ThemeResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| ThemeError::Catalog {
                dir: self.dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                continue;
            };
            let is_descriptor = path
                .extension()
                .is_some_and(|ext| DESCRIPTOR_EXTENSIONS.contains(&ext));
            if let (true, Some(stem)) = (is_descriptor, path.file_stem()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Resolve a theme name to a descriptor path.
    ///
    /// Names containing `/` are treated as paths. Anything else is looked up
    /// as `<dir>/<name>.<ext>` for each of `yml`, `yaml` and `toml` in turn;
    /// when none exists the `.yml` path is returned so loading reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if a relative path cannot be made absolute.
    pub fn resolve(&self, name: &str) -> ThemeResult<Utf8PathBuf> {
        if name.contains('/') {
            return absolutize(Utf8Path::new(name));
        }
        let found = DESCRIPTOR_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|path| path.is_file());
        Ok(found.unwrap_or_else(|| self.dir.join(format!("{name}.{}", DESCRIPTOR_EXTENSIONS[0]))))
    }
}
