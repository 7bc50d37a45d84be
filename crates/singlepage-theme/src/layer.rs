//! Loading a single theme descriptor into a [`ThemeLayer`].

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, instrument};

use crate::descriptor::{Descriptor, FileRef};
use crate::{absolutize, sass, ThemeError, ThemeOptions, ThemeResult};

/// A stylesheet, script or font referenced by a theme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Absolute path of the source file. Cleared once a stylesheet is
    /// compiled, since the output no longer corresponds to it.
    pub src_path: Option<Utf8PathBuf>,
    /// File name the asset is published under.
    pub dst_name: String,
    /// Public URL of the published asset.
    pub url: String,
    /// Text content, for assets that can be inlined.
    pub data: Option<String>,
    /// Descriptor that contributed this asset.
    pub origin: Utf8PathBuf,
}

impl Asset {
    /// Whether the asset carries content that can be embedded in the page.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.data.is_some()
    }
}

/// A font asset and its declared family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Font {
    /// The font file.
    pub asset: Asset,
    /// CSS font family name.
    pub family: Option<String>,
}

/// Raw HTML, included verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    /// The fragment content.
    pub data: String,
}

/// Assets destined for the document head, grouped by kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadAssets {
    /// Stylesheets.
    pub styles: Vec<Asset>,
    /// Font files.
    pub fonts: Vec<Font>,
    /// Scripts.
    pub scripts: Vec<Asset>,
    /// Inline HTML fragments.
    pub html: Vec<Fragment>,
}

impl HeadAssets {
    /// Append another set of head assets, keeping both orders.
    pub fn append(&mut self, other: HeadAssets) {
        self.styles.extend(other.styles);
        self.fonts.extend(other.fonts);
        self.scripts.extend(other.scripts);
        self.html.extend(other.html);
    }
}

/// Fragments placed at the start and end of the document body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BodyFragments {
    /// Inserted before the page title.
    pub header: Option<Fragment>,
    /// Inserted after the content panes.
    pub footer: Option<Fragment>,
}

impl BodyFragments {
    /// Overwrite the fragments `other` defines; keep the rest.
    pub fn overlay(&mut self, other: BodyFragments) {
        if let Some(header) = other.header {
            self.header = Some(header);
        }
        if let Some(footer) = other.footer {
            self.footer = Some(footer);
        }
    }
}

/// One descriptor with every file reference resolved and loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeLayer {
    /// Absolute path of the descriptor.
    pub descriptor: Utf8PathBuf,
    /// Head assets in descriptor order.
    pub head: HeadAssets,
    /// Body fragments.
    pub body: BodyFragments,
}

/// Loads theme descriptors into layers.
#[derive(Clone, Debug)]
pub struct ThemeLoader<'a> {
    options: &'a ThemeOptions,
}

impl<'a> ThemeLoader<'a> {
    /// Create a loader that computes URLs with `options`.
    #[must_use]
    pub fn new(options: &'a ThemeOptions) -> Self {
        Self { options }
    }

    /// Load one descriptor and everything it references.
    ///
    /// # Errors
    ///
    /// Any failure is returned as [`ThemeError::Layer`] naming `path`;
    /// nothing is returned for a partially loaded descriptor.
    #[instrument(skip(self), fields(descriptor = %path))]
    pub fn load(&self, path: &Utf8Path) -> ThemeResult<ThemeLayer> {
        self.load_layer(path).map_err(|e| e.in_layer(path))
    }

    fn load_layer(&self, path: &Utf8Path) -> ThemeResult<ThemeLayer> {
        let descriptor_path = absolutize(path)?;
        let descriptor = Descriptor::load(&descriptor_path)?;
        let base = descriptor_path
            .parent()
            .map_or_else(|| Utf8PathBuf::from("/"), Utf8Path::to_path_buf);

        let resolve = |file: &FileRef| LayerFile {
            path: base.join(&file.file),
            origin: &descriptor_path,
        };

        let mut head = HeadAssets::default();
        for file in &descriptor.styles {
            let file = resolve(file);
            // Preprocessor sources are compiled from disk after composition.
            let inline = sass::dialect_of(&file.path).is_none();
            head.styles.push(self.asset(&file, "styles", inline)?);
        }
        for file in &descriptor.scripts {
            head.scripts.push(self.asset(&resolve(file), "scripts", true)?);
        }
        for font in &descriptor.fonts {
            head.fonts.push(Font {
                asset: self.asset(&resolve(font), "fonts", false)?,
                family: font.family.clone(),
            });
        }
        for file in &descriptor.html {
            head.html.push(read_fragment(&resolve(file).path)?);
        }

        let body = BodyFragments {
            header: descriptor
                .header
                .as_deref()
                .map(|file| read_fragment(&base.join(file)))
                .transpose()?,
            footer: descriptor
                .footer
                .as_deref()
                .map(|file| read_fragment(&base.join(file)))
                .transpose()?,
        };

        debug!(
            styles = head.styles.len(),
            fonts = head.fonts.len(),
            scripts = head.scripts.len(),
            html = head.html.len(),
            "loaded theme layer"
        );

        Ok(ThemeLayer {
            descriptor: descriptor_path,
            head,
            body,
        })
    }

    fn asset(&self, file: &LayerFile<'_>, key: &'static str, inline: bool) -> ThemeResult<Asset> {
        let dst_name = file
            .path
            .file_name()
            .ok_or_else(|| ThemeError::InvalidEntry {
                section: "head",
                key: key.to_string(),
                expected: "a path naming a file",
            })?
            .to_string();

        let data = if inline {
            Some(read_text(&file.path)?)
        } else if file.path.is_file() {
            None
        } else {
            // Binary and preprocessor assets are read later, but must exist now.
            return Err(ThemeError::Read {
                path: file.path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        };

        Ok(Asset {
            src_path: Some(file.path.clone()),
            url: self.options.asset_url(&dst_name),
            dst_name,
            data,
            origin: file.origin.to_path_buf(),
        })
    }
}

struct LayerFile<'a> {
    path: Utf8PathBuf,
    origin: &'a Utf8Path,
}

fn read_text(path: &Utf8Path) -> ThemeResult<String> {
    std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_fragment(path: &Utf8Path) -> ThemeResult<Fragment> {
    read_text(path).map(|data| Fragment { data })
}
