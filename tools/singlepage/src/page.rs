//! Page assembly.
//!
//! Combines a composed theme and a document model into one [`Document`]:
//! the theme's assets go into the head, followed in the body by the title,
//! a table of contents and the main content. Every class and group gets an
//! anchor id; the table of contents links to them with `#` + id.

use singlepage_model::{ClassRecord, DocumentModel, MethodGroup, MethodRecord};
use singlepage_theme::{Asset, ComposedTheme, Font};

use crate::html::{Document, Element};

/// Separator between class and group names in group anchor ids.
pub const ANCHOR_SEPARATOR: &str = "::";

/// Anchor id of a class block.
pub fn class_anchor(class: &ClassRecord) -> &str {
    &class.name
}

/// Anchor id of a group block.
pub fn group_anchor(class: &ClassRecord, group: &MethodGroup) -> String {
    format!("{}{}{}", class.name, ANCHOR_SEPARATOR, group.name)
}

/// Builds the page tree from a theme and a model.
pub struct PageBuilder<'a> {
    theme: &'a ComposedTheme,
    title: &'a str,
}

impl<'a> PageBuilder<'a> {
    /// Create a builder for a page titled `title`.
    pub fn new(theme: &'a ComposedTheme, title: &'a str) -> Self {
        Self { theme, title }
    }

    /// Build the document tree.
    pub fn build(&self, model: &DocumentModel) -> Document {
        Document::new(
            Element::new("html")
                .child(self.head())
                .child(self.body(model)),
        )
    }

    fn head(&self) -> Element {
        let mut head = Element::new("head")
            .child(Element::new("meta").attr("charset", "UTF-8"))
            .child(Element::new("title").text(self.title));

        if let Some(faces) = font_faces(self.theme.fonts()) {
            head = head.child(style_block(faces));
        }
        for style in self.theme.styles() {
            head = head.child(match &style.data {
                Some(css) => style_block(css.clone()),
                None => Element::new("link")
                    .attr("rel", "stylesheet")
                    .attr("href", style.url.as_str()),
            });
        }
        for script in self.theme.scripts() {
            head = head.child(script_block(script));
        }
        for fragment in self.theme.html() {
            head = head.raw(fragment.data.as_str());
        }
        head
    }

    fn body(&self, model: &DocumentModel) -> Element {
        let mut body = Element::new("body");
        if let Some(header) = self.theme.header() {
            body = body.raw(header.data.as_str());
        }

        body = body.child(Element::new("h1").text(self.title)).child(
            Element::new("div")
                .class("top")
                .child(toc(model))
                .child(main(model)),
        );

        if let Some(footer) = self.theme.footer() {
            body = body.raw(footer.data.as_str());
        }
        body
    }
}

/// Build and serialize a page in one step.
pub fn render_page(theme: &ComposedTheme, model: &DocumentModel, title: &str) -> String {
    PageBuilder::new(theme, title).build(model).to_html()
}

fn style_block(css: String) -> Element {
    Element::new("style").attr("type", "text/css").raw(css)
}

fn script_block(script: &Asset) -> Element {
    let element = Element::new("script").attr("type", "text/javascript");
    match &script.data {
        Some(js) => element.raw(js.as_str()),
        None => element.attr("src", script.url.as_str()),
    }
}

fn font_faces(fonts: &[Font]) -> Option<String> {
    let rules: Vec<String> = fonts
        .iter()
        .filter_map(|font| {
            let family = font.family.as_deref()?;
            Some(format!(
                "@font-face {{ font-family: \"{}\"; src: url(\"{}\"); }}",
                family.replace('"', "\\\""),
                font.asset.url.replace('"', "%22"),
            ))
        })
        .collect();
    (!rules.is_empty()).then(|| rules.join("\n"))
}

fn toc(model: &DocumentModel) -> Element {
    Element::new("div")
        .class("tocbox")
        .children(model.classes.iter().map(toc_class))
}

fn toc_class(class: &ClassRecord) -> Element {
    let header = Element::new("div").class("tocclassheader").child(
        Element::new("a")
            .attr("href", format!("#{}", class_anchor(class)))
            .class("classref")
            .text(class.name.as_str()),
    );

    Element::new("div")
        .class("tocclassbox")
        .child(header)
        .children(class.groups.iter().map(|group| {
            Element::new("div").class("tocgroup").child(
                Element::new("a")
                    .attr("href", format!("#{}", group_anchor(class, group)))
                    .class("groupref")
                    .text(group.name.as_str()),
            )
        }))
}

fn main(model: &DocumentModel) -> Element {
    Element::new("div")
        .class("mainbox")
        .children(model.classes.iter().map(class_box))
}

fn class_box(class: &ClassRecord) -> Element {
    let mut header = Element::new("div")
        .class("classheader")
        .child(Element::new("span").class("classname").text(class.name.as_str()));
    if !class.comment.is_empty() {
        header = header.child(Element::new("span").class("comment").raw(class.comment.as_str()));
    }

    Element::new("div")
        .class("classbox")
        .id(class_anchor(class))
        .child(header)
        .children(class.groups.iter().map(|group| group_box(class, group)))
}

fn group_box(class: &ClassRecord, group: &MethodGroup) -> Element {
    Element::new("div")
        .class("groupbox")
        .id(group_anchor(class, group))
        .child(
            Element::new("div")
                .class("groupheader")
                .child(Element::new("span").class("groupname").text(group.name.as_str())),
        )
        .children(group.methods.iter().map(method_box))
}

fn method_box(method: &MethodRecord) -> Element {
    Element::new("div")
        .class("methodbox")
        .child(Element::new("span").class("methodname").text(method.name.as_str()))
        .child(Element::new("span").class("comment").raw(method.comment.as_str()))
        .child(
            Element::new("div")
                .class("code")
                .child(Element::new("pre").raw(method.code.as_str())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use singlepage_theme::{
        BodyFragments, ComposedTheme, Fragment, HeadAssets, ThemeBuilder, ThemeLayer, ThemeOptions,
    };

    fn themed() -> ComposedTheme {
        let origin = Utf8PathBuf::from("/themes/base.yml");
        let asset = |name: &str, data: Option<&str>| Asset {
            src_path: Some(Utf8PathBuf::from(format!("/themes/{name}"))),
            dst_name: name.to_string(),
            url: format!("static/{name}"),
            data: data.map(str::to_string),
            origin: origin.clone(),
        };
        let layer = ThemeLayer {
            descriptor: origin.clone(),
            head: HeadAssets {
                styles: vec![asset("a.css", Some("body { margin: 0; }"))],
                fonts: vec![Font {
                    asset: asset("Inter.woff2", None),
                    family: Some("Inter".to_string()),
                }],
                scripts: vec![asset("toc.js", Some("initToc();"))],
                html: vec![Fragment {
                    data: "<meta name=\"generator\" content=\"singlepage\">".to_string(),
                }],
            },
            body: BodyFragments {
                header: Some(Fragment {
                    data: "<header>H</header>".to_string(),
                }),
                footer: Some(Fragment {
                    data: "<footer>F</footer>".to_string(),
                }),
            },
        };
        let mut builder = ThemeBuilder::new();
        builder.push_layer(layer);
        builder.finish(&ThemeOptions::new()).unwrap()
    }

    fn alpha_model() -> DocumentModel {
        DocumentModel {
            classes: vec![ClassRecord {
                name: "Alpha".to_string(),
                comment: String::new(),
                groups: vec![MethodGroup {
                    name: "Setup".to_string(),
                    methods: vec![MethodRecord {
                        name: "test_Setup_once".to_string(),
                        comment: "<p>Runs <em>once</em>.</p>".to_string(),
                        code: "<span class=\"ruby-keyword\">def</span> test_Setup_once".to_string(),
                    }],
                }],
            }],
        }
    }

    #[test]
    fn test_anchors_match_content_ids() {
        let theme = ComposedTheme::default();
        let document = PageBuilder::new(&theme, "Suite").build(&alpha_model());
        let body = document.body().unwrap();

        let links: Vec<_> = body
            .find_all(|e| e.tag == "a")
            .into_iter()
            .filter_map(|a| a.get_attr("href"))
            .collect();
        assert_eq!(links, ["#Alpha", "#Alpha::Setup"]);

        for href in links {
            let target = body.find_by_id(&href[1..]).unwrap();
            assert_eq!(target.tag, "div");
        }
        assert!(body.find_by_id("Alpha").unwrap().has_class("classbox"));
        assert!(body.find_by_id("Alpha::Setup").unwrap().has_class("groupbox"));
    }

    #[test]
    fn test_layout_structure() {
        let theme = ComposedTheme::default();
        let document = PageBuilder::new(&theme, "Suite").build(&alpha_model());
        let body = document.body().unwrap();

        let h1 = body.elements().next().unwrap();
        assert_eq!(h1.tag, "h1");
        assert_eq!(h1.text_content(), "Suite");

        let top = body.find_all(|e| e.has_class("top"));
        let panes: Vec<_> = top[0].elements().collect();
        assert!(panes[0].has_class("tocbox"));
        assert!(panes[1].has_class("mainbox"));

        let method = body.find_all(|e| e.has_class("methodbox"))[0];
        let pre = method.find_all(|e| e.tag == "pre")[0];
        assert!(pre.text_content().starts_with("<span class=\"ruby-keyword\">"));
    }

    #[test]
    fn test_serialized_page() {
        let theme = ComposedTheme::default();
        let html = render_page(&theme, &alpha_model(), "Suite <1>");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Suite &lt;1&gt;</title>"));
        assert!(html.contains("<a href=\"#Alpha\" class=\"classref\">Alpha</a>"));
        assert!(html.contains("<a href=\"#Alpha::Setup\" class=\"groupref\">Setup</a>"));
        assert!(html.contains("<div class=\"classbox\" id=\"Alpha\">"));
        assert!(html.contains("<div class=\"groupbox\" id=\"Alpha::Setup\">"));
        assert!(html.contains("<span class=\"comment\"><p>Runs <em>once</em>.</p></span>"));
    }

    #[test]
    fn test_empty_model() {
        let theme = ComposedTheme::default();
        let document = PageBuilder::new(&theme, "Empty").build(&DocumentModel::default());
        let body = document.body().unwrap();
        assert!(body.find_all(|e| e.tag == "a").is_empty());
        assert_eq!(body.find_all(|e| e.has_class("tocbox")).len(), 1);
    }

    #[test]
    fn test_head_embeds_theme_assets() {
        let theme = themed();
        let document = PageBuilder::new(&theme, "Suite").build(&alpha_model());
        let head = document.head().unwrap();

        let styles = head.find_all(|e| e.tag == "style");
        assert_eq!(styles.len(), 2);
        assert_eq!(
            styles[0].text_content(),
            "@font-face { font-family: \"Inter\"; src: url(\"static/Inter.woff2\"); }"
        );
        assert_eq!(styles[1].text_content(), "body { margin: 0; }");
        assert_eq!(styles[1].get_attr("type"), Some("text/css"));

        let scripts = head.find_all(|e| e.tag == "script");
        assert_eq!(scripts[0].text_content(), "initToc();");
        assert_eq!(scripts[0].get_attr("type"), Some("text/javascript"));

        assert!(head.text_content().contains("<meta name=\"generator\""));
    }

    #[test]
    fn test_header_and_footer_wrap_content() {
        let theme = themed();
        let html = render_page(&theme, &alpha_model(), "Suite");

        let header = html.find("<header>H</header>").unwrap();
        let title = html.find("<h1>Suite</h1>").unwrap();
        let footer = html.find("<footer>F</footer>").unwrap();
        let main = html.find("class=\"mainbox\"").unwrap();
        assert!(header < title);
        assert!(main < footer);
        assert!(html.contains("<body><header>H</header><h1>"));
        assert!(html.ends_with("<footer>F</footer></body></html>\n"));
    }
}
