//! singlepage: single-page HTML documentation generator.
//!
//! Renders a documentation store into one HTML page, styled by a stack of
//! composable theme layers.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use singlepage::build;
use singlepage::config::{PolicyConfig, ProjectConfig};
use singlepage::generator::{register_builtin, GeneratorRegistry};
use singlepage::shipped::ShippedThemes;
use singlepage_theme::ThemeCatalog;

#[derive(Parser)]
#[command(name = "singlepage")]
#[command(author, version, about = "Single-page HTML documentation generator", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation page from a store
    Build {
        /// Documentation store (JSON)
        #[arg(value_name = "STORE")]
        store: Utf8PathBuf,

        /// Theme name or descriptor path; repeat to stack layers
        #[arg(short, long = "theme", value_name = "NAME")]
        themes: Vec<String>,

        /// Directory holding named themes
        #[arg(long, env = "SINGLEPAGE_THEMES_DIR")]
        themes_dir: Option<Utf8PathBuf>,

        /// Prefix for public asset URLs (e.g., "static/")
        #[arg(long)]
        url_prefix: Option<String>,

        /// Page title
        #[arg(long)]
        title: Option<String>,

        /// Output document
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,

        /// Project configuration file (defaults to ./singlepage.toml if present)
        #[arg(long)]
        config: Option<Utf8PathBuf>,

        /// Document classes whose names start with this
        #[arg(long)]
        class_prefix: Option<String>,

        /// Document methods whose names start with this
        #[arg(long)]
        method_prefix: Option<String>,

        /// Regex whose first capture names a method's group
        #[arg(long)]
        group_pattern: Option<String>,

        /// Collect methods without a group under this name
        #[arg(long, value_name = "NAME")]
        ungrouped: Option<String>,

        /// Minify compiled stylesheets
        #[arg(long)]
        compressed: bool,

        /// Output generator
        #[arg(long)]
        generator: Option<String>,
    },

    /// List the themes in the themes directory (or the shipped ones)
    Themes {
        /// Directory holding named themes
        #[arg(long, env = "SINGLEPAGE_THEMES_DIR")]
        themes_dir: Option<Utf8PathBuf>,
    },

    /// List the available generators
    Generators,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build {
            store,
            themes,
            themes_dir,
            url_prefix,
            title,
            output,
            config,
            class_prefix,
            method_prefix,
            group_pattern,
            ungrouped,
            compressed,
            generator,
        } => {
            let overrides = ProjectConfig {
                themes: (!themes.is_empty()).then_some(themes),
                themes_dir,
                url_prefix,
                title,
                output,
                generator,
                compressed: compressed.then_some(true),
                policy: PolicyConfig {
                    class_prefix,
                    method_prefix,
                    group_pattern,
                    ungrouped,
                },
            };
            let config = ProjectConfig::discover(config.as_deref())?
                .overlay(overrides)
                .into_build_config(store);

            build::run(&config)?;
        }

        Commands::Themes { themes_dir } => {
            let names = match themes_dir {
                Some(dir) => ThemeCatalog::new(dir).list()?,
                None => ShippedThemes::unpack()?.catalog().list()?,
            };
            for name in names {
                println!("{name}");
            }
        }

        Commands::Generators => {
            let mut registry = GeneratorRegistry::new();
            register_builtin(&mut registry)?;
            for name in registry.names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}
