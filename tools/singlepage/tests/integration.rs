//! Integration tests for the singlepage build pipeline.
//!
//! These tests run `build::run` end to end against the shipped themes and
//! throwaway theme directories.

use std::fs;

use camino::Utf8PathBuf;
use singlepage::build::{self, BuildConfig};
use tempfile::TempDir;

const STORE: &str = r#"{
  "classes": [
    {
      "full_name": "TestParser",
      "comment": {"format": "markdown", "text": "Covers the *parser*."},
      "methods": [
        {"name": "test_numbers_int", "comment": "Integers.", "markup_code": "def test_numbers_int; end"},
        {"name": "setup", "markup_code": "def setup; end"},
        {"name": "test_strings_escape", "markup_code": "def test_strings_escape; end"},
        {"name": "test_numbers_float", "markup_code": "def test_numbers_float; end"}
      ]
    },
    {
      "full_name": "ParserHelper",
      "methods": [{"name": "test_unused"}]
    },
    {
      "full_name": "TestLexer",
      "methods": [{"name": "test_tokens_ident"}]
    }
  ]
}"#;

struct Project {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        fs::write(root.join("store.json"), STORE).unwrap();
        Self { _temp: temp, root }
    }

    fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn config(&self) -> BuildConfig {
        let mut config = BuildConfig::new(self.root.join("store.json"));
        config.output = self.root.join("site/doc.html");
        config
    }
}

// =========================================================================
// Successful builds
// =========================================================================

#[test]
fn test_default_theme_build() {
    let project = Project::new();
    let mut config = project.config();
    config.title = "Parser suite".to_string();

    build::run(&config).unwrap();

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Parser suite</title>"));

    // Compiled stylesheet, inline script and footer from the default theme.
    assert!(html.contains("position: sticky"));
    assert!(html.contains("DOMContentLoaded"));
    assert!(html.contains("<footer class=\"singlepage\">"));

    // Classes are sorted and filtered; each TOC link has a target.
    let lexer = html.find("id=\"TestLexer\"").unwrap();
    let parser = html.find("id=\"TestParser\"").unwrap();
    assert!(lexer < parser);
    assert!(!html.contains("ParserHelper"));
    for anchor in ["TestLexer", "TestParser", "TestParser::numbers", "TestParser::strings"] {
        assert!(html.contains(&format!("href=\"#{anchor}\"")));
        assert!(html.contains(&format!("id=\"{anchor}\"")));
    }

    assert!(html.contains("<span class=\"comment\"><p>Covers the <em>parser</em>.</p></span>"));
    assert!(!html.contains("def setup; end"));
}

#[test]
fn test_stacked_layers_and_linked_fonts() {
    let project = Project::new();
    project.write("brand/Brand.woff2", "font bytes");
    project.write("brand/brand.css", ".classname { font-family: Brand; }");
    project.write("brand/header.html", "<header>Brand</header>");
    let brand = project.write(
        "brand.yml",
        "head:\n  styles:\n    - file: brand/brand.css\n  fonts:\n    - file: brand/Brand.woff2\n      family: Brand\nbody:\n  header: brand/header.html\n",
    );

    let mut config = project.config();
    config.themes = vec!["default".to_string(), brand.to_string()];
    config.url_prefix = "assets/".to_string();

    build::run(&config).unwrap();

    let html = fs::read_to_string(&config.output).unwrap();
    let default_css = html.find("position: sticky").unwrap();
    let brand_css = html.find(".classname { font-family: Brand; }").unwrap();
    assert!(default_css < brand_css);
    assert!(html.contains("src: url(\"assets/Brand.woff2\")"));
    assert!(html.contains("<body><header>Brand</header><h1>"));
    assert!(html.contains("<footer class=\"singlepage\">"));

    let copied = project.root.join("site/Brand.woff2");
    assert_eq!(fs::read_to_string(copied).unwrap(), "font bytes");
}

#[test]
fn test_font_already_in_output_dir_is_kept() {
    let project = Project::new();
    project.write("site/Brand.woff2", "font bytes");
    let brand = project.write(
        "site/brand.yml",
        "head:\n  fonts:\n    - file: Brand.woff2\n      family: Brand\n",
    );

    let mut config = project.config();
    config.themes = vec![brand.to_string()];

    build::run(&config).unwrap();
    build::run(&config).unwrap();

    let font = project.root.join("site/Brand.woff2");
    assert_eq!(fs::read_to_string(font).unwrap(), "font bytes");
    assert!(fs::read_to_string(&config.output).unwrap().contains("url(\"Brand.woff2\")"));
}

#[test]
fn test_collect_ungrouped_methods() {
    let project = Project::new();
    let mut config = project.config();
    config.policy.method_prefix = Some(String::new());
    config.policy.group_pattern = Some("^test_([^_]+)".to_string());
    config.policy.ungrouped = Some("misc".to_string());

    build::run(&config).unwrap();

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("id=\"TestParser::misc\""));
    assert!(html.contains("def setup; end"));
}

// =========================================================================
// Failed builds
// =========================================================================

#[test]
fn test_failing_theme_writes_nothing() {
    let project = Project::new();
    let broken = project.write("broken.yml", "head:\n  styles:\n    - file: missing.css\n");

    let mut config = project.config();
    config.themes = vec!["default".to_string(), broken.to_string()];

    let err = build::run(&config).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("can't load theme"));
    assert!(chain.contains("broken.yml"));
    assert!(!config.output.exists());
}

#[test]
fn test_unknown_theme_section_reports_keys() {
    let project = Project::new();
    let odd = project.write("odd.yml", "head: {}\nfooter: {}\n");

    let mut config = project.config();
    config.themes = vec![odd.to_string()];

    let err = build::run(&config).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains(
        "Unexpected section in theme config: got 'footer', expected one of: 'head', 'body'"
    ));
    assert!(!config.output.exists());
}

#[test]
fn test_unknown_generator() {
    let project = Project::new();
    let mut config = project.config();
    config.generator = "pdf".to_string();

    let err = build::run(&config).unwrap_err();
    assert!(err.to_string().contains("expected one of: singlepage"));
    assert!(!config.output.exists());
}

#[test]
fn test_failed_document_write_leaves_no_fonts() {
    let project = Project::new();
    project.write("brand/Brand.woff2", "font bytes");
    let brand = project.write(
        "brand.yml",
        "head:\n  fonts:\n    - file: brand/Brand.woff2\n      family: Brand\n",
    );
    // The output path is taken by a non-empty directory.
    project.write("site/doc.html/index.html", "keep");

    let mut config = project.config();
    config.themes = vec![brand.to_string()];

    assert!(build::run(&config).is_err());
    assert!(!project.root.join("site/Brand.woff2").exists());
    assert!(project.root.join("site/doc.html/index.html").is_file());
    let leftovers: Vec<_> = fs::read_dir(project.root.join("site"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(leftovers, ["doc.html"]);
}
