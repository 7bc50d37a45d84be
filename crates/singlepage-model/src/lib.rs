//! Documentation model extraction for singlepage.
//!
//! This crate turns a documentation store (classes, their methods and
//! comments, already parsed by some other tool) into a [`DocumentModel`]:
//!
//! 1. **Store** ([`store`]): the [`DocStore`] trait and a serde-backed
//!    [`StaticStore`]
//! 2. **Policy** ([`policy`]): which classes and methods are documented and
//!    how methods are grouped
//! 3. **Extract** ([`extract()`]): filtering, sorting and grouping
//! 4. **Model** ([`model`]): the flat, serializable result
//!
//! # Usage
//!
//! ```ignore
//! use singlepage_model::{extract, ExtractPolicy, StaticStore};
//!
//! let store = StaticStore::load("store.json")?;
//! let model = extract(&store, &ExtractPolicy::default())?;
//! ```

#![warn(missing_docs)]

pub mod extract;
pub mod model;
pub mod policy;
pub mod store;

use camino::Utf8PathBuf;
use thiserror::Error;

pub use extract::extract;
pub use model::{ClassRecord, DocumentModel, MethodGroup, MethodRecord};
pub use policy::{ExtractPolicy, GroupTemplate, NameFilter, NamePrefix, Ungrouped};
pub use store::{
    Comment, DocStore, Erased, Markup, MarkupFormat, StaticStore, StoreClass, StoreError,
    StoreMethod,
};

/// Errors raised while preparing extraction.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A store file could not be read.
    #[error("failed to read store: {path}")]
    StoreRead {
        /// The store path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A store file is not a valid store document.
    #[error("invalid store {path}")]
    StoreFormat {
        /// The store path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A grouping pattern is not a valid regular expression.
    #[error("invalid group pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A grouping pattern has no capture group to take the name from.
    #[error("group pattern '{0}' has no capture group")]
    MissingCapture(String),

    /// Ungrouped methods were to be collected under an empty group name.
    #[error("ungrouped methods need a non-empty group name")]
    EmptyGroupName,
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
