//! Output generators.
//!
//! A [`Generator`] turns a documentation store into a finished document.
//! Generators are looked up by name in a [`GeneratorRegistry`]; nothing is
//! registered implicitly, callers opt in with [`register_builtin`] or their
//! own [`GeneratorRegistry::register`] calls.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use camino::Utf8PathBuf;
use singlepage_model::{extract, DocStore, ExtractPolicy, StoreError};
use singlepage_theme::{compose, ThemeOptions};
use tracing::{debug, info, instrument};

use crate::config::PolicyConfig;
use crate::page::PageBuilder;

/// Name of the built-in single-page generator.
pub const SINGLEPAGE: &str = "singlepage";

/// Settings handed to a generator constructor.
#[derive(Clone, Debug, Default)]
pub struct GeneratorOptions {
    /// Theme descriptor paths, lowest precedence first.
    pub themes: Vec<Utf8PathBuf>,
    /// URL prefix and stylesheet output style.
    pub theme: ThemeOptions,
    /// Page title.
    pub title: String,
    /// Class and method selection.
    pub policy: PolicyConfig,
}

/// A file the generated document links to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkedAsset {
    /// Where the file comes from.
    pub source: Utf8PathBuf,
    /// File name to publish it under, next to the document.
    pub name: String,
}

/// The result of a generator run.
#[derive(Clone, Debug, Default)]
pub struct Output {
    /// The serialized document.
    pub document: String,
    /// Files the document refers to by URL.
    pub linked: Vec<LinkedAsset>,
}

/// A documentation output format.
pub trait Generator {
    /// Registry name.
    fn name(&self) -> &'static str;

    /// Render `store` into a document held in memory.
    ///
    /// Concrete stores are passed through [`singlepage_model::Erased`].
    fn generate(&self, store: &dyn DocStore<Error = StoreError>) -> Result<Output>;
}

/// Creates a generator from options.
pub type Constructor = fn(&GeneratorOptions) -> Result<Box<dyn Generator>>;

/// Generators available by name.
#[derive(Default)]
pub struct GeneratorRegistry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is already taken.
    pub fn register(&mut self, name: &'static str, constructor: Constructor) -> Result<()> {
        if self.constructors.contains_key(name) {
            bail!("generator '{name}' is already registered");
        }
        debug!(generator = name, "registered generator");
        self.constructors.insert(name, constructor);
        Ok(())
    }

    /// Construct the generator registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no generator has that name, or if its constructor
    /// rejects `options`.
    pub fn create(&self, name: &str, options: &GeneratorOptions) -> Result<Box<dyn Generator>> {
        let Some(constructor) = self.constructors.get(name) else {
            bail!(
                "unknown generator '{name}', expected one of: {}",
                self.names().join(", ")
            );
        };
        constructor(options).with_context(|| format!("failed to set up generator '{name}'"))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.constructors.keys().copied().collect()
    }
}

/// Register the generators shipped with this crate.
///
/// # Errors
///
/// Returns an error if one of the built-in names is already taken.
pub fn register_builtin(registry: &mut GeneratorRegistry) -> Result<()> {
    registry.register(SINGLEPAGE, SinglePageGenerator::boxed)
}

/// Renders the whole store into one themed HTML page.
#[derive(Debug)]
pub struct SinglePageGenerator {
    themes: Vec<Utf8PathBuf>,
    theme: ThemeOptions,
    title: String,
    policy: ExtractPolicy,
}

impl SinglePageGenerator {
    /// Create the generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy settings don't form a valid policy.
    pub fn new(options: &GeneratorOptions) -> Result<Self> {
        Ok(Self {
            themes: options.themes.clone(),
            theme: options.theme.clone(),
            title: options.title.clone(),
            policy: options.policy.to_policy()?,
        })
    }

    fn boxed(options: &GeneratorOptions) -> Result<Box<dyn Generator>> {
        Ok(Box::new(Self::new(options)?))
    }
}

impl Generator for SinglePageGenerator {
    fn name(&self) -> &'static str {
        SINGLEPAGE
    }

    #[instrument(skip_all, fields(layers = self.themes.len()))]
    fn generate(&self, store: &dyn DocStore<Error = StoreError>) -> Result<Output> {
        let theme = compose(&self.themes, &self.theme).context("failed to compose theme")?;
        let model = extract(store, &self.policy).context("failed to read documentation store")?;
        if model.is_empty() {
            info!("no documented classes; the page will only carry the theme");
        }

        let document = PageBuilder::new(&theme, &self.title).build(&model).to_html();
        let linked = theme
            .linked_assets()
            .filter_map(|asset| {
                Some(LinkedAsset {
                    source: asset.src_path.clone()?,
                    name: asset.dst_name.clone(),
                })
            })
            .collect();

        Ok(Output { document, linked })
    }
}
