//! Documentation build system.
//!
//! This module orchestrates one generation run:
//! 1. Resolve theme names through the catalog
//! 2. Load the documentation store
//! 3. Render the document in memory with the chosen generator
//! 4. Stage linked assets and the document under temporary names, then
//!    publish them together

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use singlepage_model::{Erased, StaticStore};
use singlepage_theme::{StyleOutput, ThemeCatalog, ThemeOptions};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::config::PolicyConfig;
use crate::generator::{register_builtin, GeneratorOptions, GeneratorRegistry, LinkedAsset, SINGLEPAGE};
use crate::shipped::ShippedThemes;

/// Output path used when none is configured.
pub const DEFAULT_OUTPUT: &str = "doc.html";

/// Page title used when none is configured.
pub const DEFAULT_TITLE: &str = "Documentation";

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "default";

/// Build configuration.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Documentation store (JSON).
    pub store: Utf8PathBuf,
    /// Theme names or descriptor paths, lowest precedence first.
    pub themes: Vec<String>,
    /// Directory holding named themes; `None` uses the shipped themes.
    pub themes_dir: Option<Utf8PathBuf>,
    /// Prefix for public asset URLs.
    pub url_prefix: String,
    /// Page title.
    pub title: String,
    /// Output document path.
    pub output: Utf8PathBuf,
    /// Generator name.
    pub generator: String,
    /// Output style for compiled stylesheets.
    pub style: StyleOutput,
    /// Class and method selection.
    pub policy: PolicyConfig,
}

impl BuildConfig {
    /// Defaults for documenting `store`.
    pub fn new(store: impl Into<Utf8PathBuf>) -> Self {
        Self {
            store: store.into(),
            themes: vec![DEFAULT_THEME.to_string()],
            themes_dir: None,
            url_prefix: String::new(),
            title: DEFAULT_TITLE.to_string(),
            output: Utf8PathBuf::from(DEFAULT_OUTPUT),
            generator: SINGLEPAGE.to_string(),
            style: StyleOutput::default(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Run the documentation build.
///
/// # Errors
///
/// Any failure aborts the run. Nothing is written unless the document is
/// rendered, and linked assets new to the output directory are removed again
/// if the document cannot be written.
#[instrument(skip_all, fields(store = %config.store))]
pub fn run(config: &BuildConfig) -> Result<()> {
    info!("Building documentation from {}", config.store);

    let shipped;
    let catalog = match &config.themes_dir {
        Some(dir) => ThemeCatalog::new(dir.clone()),
        None => {
            shipped = ShippedThemes::unpack()?;
            shipped.catalog()
        }
    };
    let themes = config
        .themes
        .iter()
        .map(|name| {
            catalog
                .resolve(name)
                .with_context(|| format!("failed to resolve theme '{name}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(?themes, "resolved themes");

    let mut registry = GeneratorRegistry::new();
    register_builtin(&mut registry)?;
    let options = GeneratorOptions {
        themes,
        theme: ThemeOptions::new()
            .url_prefix(config.url_prefix.as_str())
            .style(config.style),
        title: config.title.clone(),
        policy: config.policy.clone(),
    };
    let generator = registry.create(&config.generator, &options)?;

    let store = StaticStore::load(&config.store).context("failed to load documentation store")?;
    info!("Loaded {} classes from {}", store.classes.len(), config.store);

    let output = generator.generate(&Erased(&store))?;

    let dir = output_dir(&config.output);
    fs::create_dir_all(dir).with_context(|| format!("failed to create {dir}"))?;

    let mut assets = Vec::new();
    for asset in &output.linked {
        if let Some(staged) = stage_asset(dir, asset)? {
            assets.push(staged);
        }
    }
    let document = Staged::text(&config.output, &output.document)?;
    publish(assets, document)?;

    info!("Documentation written to {}", config.output);
    Ok(())
}

fn output_dir(output: &Utf8Path) -> &Utf8Path {
    match output.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    }
}

/// Content written to a temporary file next to its final path.
struct Staged {
    file: NamedTempFile,
    target: Utf8PathBuf,
}

impl Staged {
    fn new(target: &Utf8Path) -> Result<Self> {
        let file = NamedTempFile::new_in(output_dir(target))
            .with_context(|| format!("failed to create temporary file for {target}"))?;
        Ok(Self {
            file,
            target: target.to_path_buf(),
        })
    }

    fn text(target: &Utf8Path, contents: &str) -> Result<Self> {
        let mut staged = Self::new(target)?;
        staged
            .file
            .write_all(contents.as_bytes())
            .with_context(|| format!("failed to write {target}"))?;
        Ok(staged)
    }

    fn copy(source: &Utf8Path, target: &Utf8Path) -> Result<Self> {
        let mut staged = Self::new(target)?;
        let mut reader =
            fs::File::open(source).with_context(|| format!("failed to read {source}"))?;
        io::copy(&mut reader, &mut staged.file)
            .with_context(|| format!("failed to copy {source} to {target}"))?;
        Ok(staged)
    }

    fn persist(self) -> Result<()> {
        let Self { file, target } = self;
        file.persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to write {target}"))?;
        Ok(())
    }
}

/// Stage a copy of `asset` in `dir`, unless it already lives there.
fn stage_asset(dir: &Utf8Path, asset: &LinkedAsset) -> Result<Option<Staged>> {
    let target = dir.join(&asset.name);
    if same_file(&asset.source, &target) {
        debug!(asset = %target, "linked asset already in place");
        return Ok(None);
    }
    debug!(source = %asset.source, target = %target, "staging linked asset");
    Staged::copy(&asset.source, &target).map(Some)
}

fn same_file(a: &Utf8Path, b: &Utf8Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Move staged assets and then the document into place.
///
/// If any step fails, assets this call created are removed again.
fn publish(assets: Vec<Staged>, document: Staged) -> Result<()> {
    let mut created = Vec::new();
    for asset in assets {
        let target = asset.target.clone();
        let existed = target.exists();
        if let Err(err) = asset.persist() {
            remove_created(&created);
            return Err(err);
        }
        if !existed {
            created.push(target);
        }
    }
    if let Err(err) = document.persist() {
        remove_created(&created);
        return Err(err);
    }
    Ok(())
}

fn remove_created(created: &[Utf8PathBuf]) {
    for path in created {
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path, %err, "failed to remove linked asset");
        }
    }
}
