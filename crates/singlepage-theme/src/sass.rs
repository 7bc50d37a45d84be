//! Stylesheet preprocessing.
//!
//! Sass (`.sass`) and SCSS (`.scss`) stylesheets are compiled to CSS with
//! `grass`. Imports resolve relative to the stylesheet's own directory only.

use camino::Utf8Path;
use grass::{InputSyntax, OutputStyle};
use tracing::debug;

use crate::layer::Asset;
use crate::{StyleOutput, ThemeError, ThemeOptions, ThemeResult};

/// Preprocessor dialect of a stylesheet, if it has one.
#[must_use]
pub fn dialect_of(path: &Utf8Path) -> Option<InputSyntax> {
    match path.extension()? {
        "sass" => Some(InputSyntax::Sass),
        "scss" => Some(InputSyntax::Scss),
        _ => None,
    }
}

/// Compile a preprocessor stylesheet on disk to CSS.
///
/// # Errors
///
/// Returns [`ThemeError::Compile`] with the compiler's message on failure.
pub fn compile(path: &Utf8Path, syntax: InputSyntax, style: StyleOutput) -> ThemeResult<String> {
    let style = match style {
        StyleOutput::Expanded => OutputStyle::Expanded,
        StyleOutput::Compressed => OutputStyle::Compressed,
    };
    let options = grass::Options::default().input_syntax(syntax).style(style);
    grass::from_path(path.as_std_path(), &options).map_err(|e| ThemeError::Compile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Compile `asset` in place if its source is a preprocessor stylesheet.
///
/// The destination name gets a `.css` extension, the URL is recomputed and
/// the source path is dropped. Plain stylesheets are left untouched.
pub(crate) fn compile_asset(asset: &mut Asset, options: &ThemeOptions) -> ThemeResult<()> {
    let Some(src_path) = asset.src_path.clone() else {
        return Ok(());
    };
    let Some(syntax) = dialect_of(&src_path) else {
        return Ok(());
    };

    debug!(source = %src_path, "compiling stylesheet");
    let css = compile(&src_path, syntax, options.style)?;

    let stem = Utf8Path::new(&asset.dst_name)
        .file_stem()
        .unwrap_or(&asset.dst_name);
    asset.dst_name = format!("{stem}.css");
    asset.url = options.asset_url(&asset.dst_name);
    asset.data = Some(css);
    asset.src_path = None;
    Ok(())
}
