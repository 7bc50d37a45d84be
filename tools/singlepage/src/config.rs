//! Project configuration.
//!
//! A build can be configured from an optional `singlepage.toml` next to the
//! project, with command-line options taking precedence:
//!
//! ```toml
//! themes = ["default", "themes/brand.yml"]
//! url_prefix = "static/"
//! title = "Parser test suite"
//! output = "site/index.html"
//!
//! [policy]
//! class_prefix = "Test"
//! method_prefix = "test_"
//! ungrouped = "misc"
//! ```

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use singlepage_model::{
    ExtractPolicy, GroupTemplate, ModelError, ModelResult, NamePrefix, Ungrouped,
};
use singlepage_theme::StyleOutput;
use tracing::debug;

use crate::build::BuildConfig;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "singlepage.toml";

/// Settings for class and method selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Documented classes start with this. Defaults to `Test`.
    pub class_prefix: Option<String>,
    /// Documented methods start with this. Defaults to `test_`.
    pub method_prefix: Option<String>,
    /// Regex whose first capture names a method's group.
    ///
    /// Defaults to the word following the method prefix.
    pub group_pattern: Option<String>,
    /// Collect methods without a group under this name instead of dropping
    /// them.
    pub ungrouped: Option<String>,
}

impl PolicyConfig {
    /// Fill unset fields from `base`.
    #[must_use]
    pub fn or(self, base: PolicyConfig) -> Self {
        Self {
            class_prefix: self.class_prefix.or(base.class_prefix),
            method_prefix: self.method_prefix.or(base.method_prefix),
            group_pattern: self.group_pattern.or(base.group_pattern),
            ungrouped: self.ungrouped.or(base.ungrouped),
        }
    }

    /// Build the extraction policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the group pattern is invalid or the ungrouped
    /// bucket name is empty.
    pub fn to_policy(&self) -> ModelResult<ExtractPolicy> {
        let mut policy = ExtractPolicy::new();
        if let Some(prefix) = &self.class_prefix {
            policy = policy.classes(NamePrefix::new(prefix.as_str()));
        }
        if let Some(prefix) = &self.method_prefix {
            policy = policy.methods(NamePrefix::new(prefix.as_str()));
        }

        let groups = match (&self.group_pattern, &self.method_prefix) {
            (Some(pattern), _) => GroupTemplate::new(pattern)?,
            (None, Some(prefix)) => GroupTemplate::for_prefix(prefix)?,
            (None, None) => GroupTemplate::default(),
        };
        policy = policy.groups(groups);

        if let Some(bucket) = &self.ungrouped {
            if bucket.is_empty() {
                return Err(ModelError::EmptyGroupName);
            }
            policy = policy.ungrouped(Ungrouped::Collect(bucket.clone()));
        }
        Ok(policy)
    }
}

/// Build settings, each optional. Unset fields keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Theme names or descriptor paths, lowest precedence first.
    pub themes: Option<Vec<String>>,
    /// Directory holding named themes.
    pub themes_dir: Option<Utf8PathBuf>,
    /// Prefix for public asset URLs.
    pub url_prefix: Option<String>,
    /// Page title.
    pub title: Option<String>,
    /// Output document path.
    pub output: Option<Utf8PathBuf>,
    /// Generator name.
    pub generator: Option<String>,
    /// Minify compiled stylesheets.
    pub compressed: Option<bool>,
    /// Class and method selection.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl ProjectConfig {
    /// Parse a configuration file's content.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or unknown keys.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a configuration file.
    ///
    /// Relative paths in the file are taken relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("invalid config {path}"))?;

        let base = path.parent().unwrap_or(Utf8Path::new(""));
        config.themes_dir = config.themes_dir.map(|dir| base.join(dir));
        config.output = config.output.map(|out| base.join(out));
        config.themes = config.themes.map(|themes| {
            themes
                .into_iter()
                .map(|theme| {
                    if theme.contains('/') {
                        base.join(theme).into_string()
                    } else {
                        theme
                    }
                })
                .collect()
        });
        debug!(path = %path, "loaded project config");
        Ok(config)
    }

    /// Load `explicit` if given, else [`CONFIG_FILE`] if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be loaded.
    pub fn discover(explicit: Option<&Utf8Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Utf8Path::new(CONFIG_FILE).is_file() => Self::load(Utf8Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    /// Combine with `overrides`, whose set fields win.
    #[must_use]
    pub fn overlay(self, overrides: ProjectConfig) -> Self {
        Self {
            themes: overrides.themes.or(self.themes),
            themes_dir: overrides.themes_dir.or(self.themes_dir),
            url_prefix: overrides.url_prefix.or(self.url_prefix),
            title: overrides.title.or(self.title),
            output: overrides.output.or(self.output),
            generator: overrides.generator.or(self.generator),
            compressed: overrides.compressed.or(self.compressed),
            policy: overrides.policy.or(self.policy),
        }
    }

    /// Turn into a build of `store`, filling in defaults.
    pub fn into_build_config(self, store: impl Into<Utf8PathBuf>) -> BuildConfig {
        let mut config = BuildConfig::new(store);
        if let Some(themes) = self.themes {
            config.themes = themes;
        }
        if self.themes_dir.is_some() {
            config.themes_dir = self.themes_dir;
        }
        if let Some(prefix) = self.url_prefix {
            config.url_prefix = prefix;
        }
        if let Some(title) = self.title {
            config.title = title;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(generator) = self.generator {
            config.generator = generator;
        }
        if self.compressed == Some(true) {
            config.style = StyleOutput::Compressed;
        }
        config.policy = self.policy;
        config
    }
}
