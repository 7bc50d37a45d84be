//! Documentation store adapter.
//!
//! The store is produced by an external documentation tool. Comments arrive
//! either as markup to be rendered or as plain text; the distinction is made
//! once, when the store is deserialized.

use camino::Utf8Path;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::error::Error;
use std::fmt;

use crate::{ModelError, ModelResult};

/// Source of classes and methods to document.
pub trait DocStore {
    /// Error raised when the store cannot be read.
    type Error: Error + Send + Sync + 'static;

    /// All classes and modules, in store order.
    fn classes(&self) -> Result<Vec<StoreClass>, Self::Error>;
}

impl<S: DocStore + ?Sized> DocStore for &S {
    type Error = S::Error;

    fn classes(&self) -> Result<Vec<StoreClass>, Self::Error> {
        (**self).classes()
    }
}

/// Type-erased store error, for callers that hold `dyn DocStore`.
#[derive(Debug)]
pub struct StoreError(Box<dyn Error + Send + Sync + 'static>);

impl StoreError {
    /// Wrap a concrete store error.
    pub fn new(error: impl Error + Send + Sync + 'static) -> Self {
        Self(Box::new(error))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// Adapter exposing any store as `DocStore<Error = StoreError>`.
///
/// ```ignore
/// let store = StaticStore::load("store.json")?;
/// let erased: &dyn DocStore<Error = StoreError> = &Erased(&store);
/// ```
#[derive(Debug, Clone)]
pub struct Erased<S>(pub S);

impl<S: DocStore> DocStore for Erased<S> {
    type Error = StoreError;

    fn classes(&self) -> Result<Vec<StoreClass>, Self::Error> {
        self.0.classes().map_err(StoreError::new)
    }
}

/// A class or module as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreClass {
    /// Fully qualified name; unique within the store.
    pub full_name: String,

    /// Class comment.
    #[serde(default)]
    pub comment: Comment,

    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<StoreMethod>,
}

/// A method as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMethod {
    /// Method name.
    pub name: String,

    /// Method comment.
    #[serde(default)]
    pub comment: Comment,

    /// Source code, already rendered as markup.
    #[serde(default)]
    pub markup_code: String,
}

/// A comment attached to a class or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comment {
    /// Plain text, used as-is.
    PlainText(String),
    /// Structured markup, rendered before use.
    Markup(Markup),
}

impl Default for Comment {
    fn default() -> Self {
        Self::PlainText(String::new())
    }
}

impl Comment {
    /// Text to show for this comment.
    ///
    /// Markup is rendered and trimmed; plain text is returned unchanged.
    pub fn description(&self) -> String {
        match self {
            Self::PlainText(text) => text.clone(),
            Self::Markup(markup) => markup.render().trim().to_string(),
        }
    }
}

/// Markup language of a structured comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupFormat {
    /// CommonMark.
    #[default]
    Markdown,
    /// Already-rendered HTML.
    Html,
}

/// A structured comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    /// Markup language.
    #[serde(default)]
    pub format: MarkupFormat,

    /// Comment source.
    pub text: String,
}

impl Markup {
    /// Render to HTML.
    pub fn render(&self) -> String {
        match self.format {
            MarkupFormat::Html => self.text.clone(),
            MarkupFormat::Markdown => {
                let mut options = Options::empty();
                options.insert(Options::ENABLE_TABLES);
                options.insert(Options::ENABLE_STRIKETHROUGH);
                let parser = Parser::new_ext(&self.text, options);
                let mut out = String::with_capacity(self.text.len() * 3 / 2);
                html::push_html(&mut out, parser);
                out
            }
        }
    }
}

/// An in-memory store, usually deserialized from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticStore {
    /// Classes in store order.
    pub classes: Vec<StoreClass>,
}

impl StaticStore {
    /// Create a store holding `classes`.
    pub fn new(classes: Vec<StoreClass>) -> Self {
        Self { classes }
    }

    /// Load a store from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a store.
    pub fn load(path: impl AsRef<Utf8Path>) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::StoreRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ModelError::StoreFormat {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DocStore for StaticStore {
    type Error = Infallible;

    fn classes(&self) -> Result<Vec<StoreClass>, Self::Error> {
        Ok(self.classes.clone())
    }
}
