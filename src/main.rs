use clap::{Parser, Subcommand};
use evolved_site::declarations::Declarations;
use evolved_site::{config, convert, format, generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "evolved-site")]
#[command(about = "Static site generator for multi-locale code pattern catalogs")]
#[command(long_about = "\
Static site generator for multi-locale code pattern catalogs

Each entry is one before/after code pattern, stored as a JSON or YAML file
under its category directory. Every declared locale gets a full copy of the
site; untranslated text falls back to the baseline locale.

Project structure:

  project/
  ├── site.toml                          # Optional, overrides stock defaults
  ├── html-generators/
  │   ├── categories.properties          # id=Display Name, in display order
  │   └── locales.properties             # id=Display Name, baseline first
  ├── content/
  │   └── language/
  │       ├── records.json               # One entry per file
  │       └── sealed-classes.yaml
  ├── translations/
  │   ├── strings/en.yaml                # Baseline UI strings (required)
  │   ├── strings/es.json                # Sparse per-locale overrides
  │   └── content/es/language/records.json
  ├── templates/                         # slug-template.html, index.html, cards
  └── proof/                             # Optional proof sources per entry

Output:

  site/index.html, site/<category>/<slug>.html, site/data/snippets.json
  site/<locale>/...                      # Same layout for every other locale

Run 'evolved-site gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Project root
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Output directory (overrides paths.output in site.toml)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Show progress logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build every declared locale, or just one
    Build {
        /// Build only this locale
        #[arg(long)]
        locale: Option<String>,
    },
    /// Validate the project without writing output
    Check,
    /// Convert entry files to another format, verifying each round trip
    Convert {
        /// Target format
        #[arg(long, default_value = "yaml", value_parser = ["json", "yaml"])]
        to: String,
        /// Write converted files here; without it, only verify
        #[arg(long)]
        into: Option<PathBuf>,
    },
    /// Print a stock site.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Build { locale } => {
            let project = load_project(&cli.root, cli.output, cli.verbose)?;
            let selection = match locale {
                Some(l) => generate::LocaleSelection::One(l),
                None => generate::LocaleSelection::All,
            };
            println!("==> Building → {}", project.paths.output.display());
            let reports = generate::build(&project, &selection)?;
            output::print_build_output(&reports, &project.paths.output);
        }
        Command::Check => {
            println!("==> Checking {}", cli.root.display());
            let project = load_project(&cli.root, cli.output, cli.verbose)?;
            let report = generate::check(&project)?;
            output::print_check_output(&report, &project.declarations);
            println!("==> Project is valid");
        }
        Command::Convert { to, into } => {
            let site_config = config::load_config(&cli.root)?;
            let paths = site_config.paths.resolved(&cli.root);
            let declarations = Declarations::load(&paths.categories, &paths.locales)?;
            let target = format::codec_by_id(&to)
                .ok_or_else(|| format!("unknown format '{to}'"))?;
            let outcomes = convert::convert_entries(
                &paths.content,
                &declarations.categories,
                target,
                into.as_deref(),
            )?;
            output::print_convert_output(&outcomes, &paths.content);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Warnings by default; `-v` adds progress. `RUST_LOG` overrides both.
fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "warn,evolved_site=info" } else { "warn" };
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(default)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

/// Load the project, applying the output override. Verbose runs also print
/// the content inventory.
fn load_project(
    root: &Path,
    output_dir: Option<PathBuf>,
    verbose: bool,
) -> Result<generate::Project, generate::GenerateError> {
    let project = generate::Project::load(root)?;
    let project = match output_dir {
        Some(dir) => project.with_output(dir),
        None => project,
    };
    if verbose {
        output::print_load_output(&project.store, &project.declarations);
    }
    Ok(project)
}
