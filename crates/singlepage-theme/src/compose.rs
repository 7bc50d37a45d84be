//! Folding theme layers into a [`ComposedTheme`].

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{info, instrument};

use crate::layer::{Asset, BodyFragments, Font, Fragment, HeadAssets, ThemeLayer, ThemeLoader};
use crate::{sass, ThemeOptions, ThemeResult};

/// Accumulates layers in order and yields one [`ComposedTheme`].
#[derive(Debug, Default)]
pub struct ThemeBuilder {
    head: HeadAssets,
    body: BodyFragments,
    layers: Vec<Utf8PathBuf>,
}

impl ThemeBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one layer: head assets are appended, body fragments replace
    /// earlier ones.
    pub fn push_layer(&mut self, layer: ThemeLayer) -> &mut Self {
        self.head.append(layer.head);
        self.body.overlay(layer.body);
        self.layers.push(layer.descriptor);
        self
    }

    /// Compile preprocessor stylesheets and seal the theme.
    ///
    /// # Errors
    ///
    /// Returns an error naming the contributing descriptor if a stylesheet
    /// fails to compile.
    pub fn finish(self, options: &ThemeOptions) -> ThemeResult<ComposedTheme> {
        let Self {
            mut head,
            body,
            layers,
        } = self;

        for style in &mut head.styles {
            sass::compile_asset(style, options).map_err(|e| e.in_layer(&style.origin))?;
        }

        Ok(ComposedTheme { head, body, layers })
    }
}

/// The merge of every layer for one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComposedTheme {
    head: HeadAssets,
    body: BodyFragments,
    layers: Vec<Utf8PathBuf>,
}

impl ComposedTheme {
    /// Stylesheets, in layer order. Preprocessor sources are already compiled.
    #[must_use]
    pub fn styles(&self) -> &[Asset] {
        &self.head.styles
    }

    /// Fonts, in layer order.
    #[must_use]
    pub fn fonts(&self) -> &[Font] {
        &self.head.fonts
    }

    /// Scripts, in layer order.
    #[must_use]
    pub fn scripts(&self) -> &[Asset] {
        &self.head.scripts
    }

    /// Inline head HTML, in layer order.
    #[must_use]
    pub fn html(&self) -> &[Fragment] {
        &self.head.html
    }

    /// Header from the last layer that defines one.
    #[must_use]
    pub fn header(&self) -> Option<&Fragment> {
        self.body.header.as_ref()
    }

    /// Footer from the last layer that defines one.
    #[must_use]
    pub fn footer(&self) -> Option<&Fragment> {
        self.body.footer.as_ref()
    }

    /// Descriptors merged into this theme, in order.
    #[must_use]
    pub fn layers(&self) -> &[Utf8PathBuf] {
        &self.layers
    }

    /// Assets the page refers to by URL rather than embedding.
    pub fn linked_assets(&self) -> impl Iterator<Item = &Asset> {
        self.head
            .fonts
            .iter()
            .map(|font| &font.asset)
            .filter(|asset| asset.src_path.is_some())
    }
}

/// Load every descriptor in order and compose them.
///
/// # Errors
///
/// Returns the first loading or compilation error; no theme is produced.
#[instrument(skip_all, fields(layers = paths.len()))]
pub fn compose<P: AsRef<Utf8Path>>(paths: &[P], options: &ThemeOptions) -> ThemeResult<ComposedTheme> {
    let loader = ThemeLoader::new(options);
    let mut builder = ThemeBuilder::new();
    for path in paths {
        builder.push_layer(loader.load(path.as_ref())?);
    }
    let theme = builder.finish(options)?;
    info!(
        styles = theme.styles().len(),
        fonts = theme.fonts().len(),
        scripts = theme.scripts().len(),
        "composed theme"
    );
    Ok(theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
            Self { _temp: temp, root }
        }

        fn write(&self, name: &str, content: &str) -> Utf8PathBuf {
            let path = self.root.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            path
        }
    }

    fn names(assets: &[Asset]) -> Vec<&str> {
        assets.iter().map(|a| a.dst_name.as_str()).collect()
    }

    #[test]
    fn test_head_assets_append_in_layer_order() {
        let fx = Fixture::new();
        for name in ["one/a.css", "one/b.css", "two/c.css", "one/x.js", "two/y.js"] {
            fx.write(name, "/* */");
        }
        let first = fx.write(
            "one/theme.yml",
            "head:\n  styles:\n    - file: a.css\n    - file: b.css\n  scripts:\n    - file: x.js\n",
        );
        let second = fx.write(
            "two/theme.yml",
            "head:\n  scripts:\n    - file: y.js\n  styles:\n    - file: c.css\n",
        );

        let theme = compose(&[first.clone(), second.clone()], &ThemeOptions::new()).unwrap();
        assert_eq!(names(theme.styles()), ["a.css", "b.css", "c.css"]);
        assert_eq!(names(theme.scripts()), ["x.js", "y.js"]);
        assert_eq!(theme.layers(), [first, second]);
    }

    #[test]
    fn test_body_last_write_wins() {
        let fx = Fixture::new();
        fx.write("h1.html", "H1");
        fx.write("h2.html", "H2");
        fx.write("f1.html", "F1");
        let first = fx.write("first.yml", "body:\n  header: h1.html\n  footer: f1.html\n");
        let second = fx.write("second.yml", "body:\n  header: h2.html\n");

        let theme = compose(&[first, second], &ThemeOptions::new()).unwrap();
        assert_eq!(theme.header().map(|f| f.data.as_str()), Some("H2"));
        assert_eq!(theme.footer().map(|f| f.data.as_str()), Some("F1"));
    }

    #[test]
    fn test_absent_body_keys_stay_absent() {
        let fx = Fixture::new();
        fx.write("a.css", "");
        let only = fx.write("only.yml", "head:\n  styles:\n    - file: a.css\n");

        let theme = compose(&[only], &ThemeOptions::new()).unwrap();
        assert!(theme.header().is_none());
        assert!(theme.footer().is_none());
    }

    #[test]
    fn test_preprocessed_style_then_plain_style() {
        let fx = Fixture::new();
        fx.write("base/a.scss", "$fg: #222;\nbody { color: $fg; }\n");
        fx.write("base/h1.html", "H1");
        fx.write("site/b.css", "p { margin: 0; }");
        fx.write("site/h2.html", "H2");
        let first = fx.write(
            "base/theme.yml",
            "head:\n  styles:\n    - file: a.scss\nbody:\n  header: h1.html\n",
        );
        let second = fx.write(
            "site/theme.yml",
            "head:\n  styles:\n    - file: b.css\nbody:\n  header: h2.html\n",
        );

        let options = ThemeOptions::new().url_prefix("/static/");
        let theme = compose(&[first, second], &options).unwrap();

        assert_eq!(names(theme.styles()), ["a.css", "b.css"]);
        let compiled = &theme.styles()[0];
        assert!(compiled.src_path.is_none());
        assert_eq!(compiled.url, "/static/a.css");
        assert!(compiled.data.as_deref().unwrap().contains("color: #222"));
        let plain = &theme.styles()[1];
        assert_eq!(plain.src_path.as_ref(), Some(&fx.root.join("site/b.css")));
        assert_eq!(plain.url, "/static/b.css");
        assert_eq!(theme.header().map(|f| f.data.as_str()), Some("H2"));
    }

    #[test]
    fn test_compile_failure_names_descriptor() {
        let fx = Fixture::new();
        fx.write("bad.scss", "body { color: ; ");
        let descriptor = fx.write("bad.yml", "head:\n  styles:\n    - file: bad.scss\n");

        let err = compose(&[descriptor.clone()], &ThemeOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Compilation);
        assert_eq!(err.to_string(), format!("can't load theme - {descriptor}"));
    }

    #[test]
    fn test_failed_layer_aborts_composition() {
        let fx = Fixture::new();
        fx.write("a.css", "");
        let good = fx.write("good.yml", "head:\n  styles:\n    - file: a.css\n");
        let bad = fx.write("bad.yml", "head:\n  stylez: []\n");

        let err = compose(&[good, bad], &ThemeOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigValidation);
    }

    #[test]
    fn test_linked_assets_are_fonts_with_sources() {
        let fx = Fixture::new();
        fx.write("Inter.woff2", "font");
        let descriptor = fx.write(
            "fonts.yml",
            "head:\n  fonts:\n    - file: Inter.woff2\n      family: Inter\n",
        );

        let theme = compose(&[descriptor], &ThemeOptions::new()).unwrap();
        let linked: Vec<_> = theme.linked_assets().map(|a| a.dst_name.as_str()).collect();
        assert_eq!(linked, ["Inter.woff2"]);
    }
}
