use clap::{Parser, Subcommand};
use folio_site::dom::RecordingDocument;
use folio_site::generate::{self, Site};
use folio_site::locale::{JsonFileStore, MemoryStore, PreferenceStore};
use folio_site::session::{self, Session, SessionEnv};
use folio_site::{config, content, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment flags for a scripted preview.
#[derive(clap::Args, Clone)]
struct PreviewArgs {
    /// Event script (TOML, `[[events]]` tables)
    #[arg(long)]
    script: Option<PathBuf>,

    /// JSON file standing in for localStorage; kept between runs
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Behave as if prefers-reduced-motion is set
    #[arg(long)]
    reduced_motion: bool,

    /// Behave as a touch device (orientation-driven tilt)
    #[arg(long)]
    coarse_pointer: bool,

    /// Where to write the rendered final state
    #[arg(long)]
    out: Option<PathBuf>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio-site")]
#[command(about = "Bilingual single-page portfolio generator")]
#[command(long_about = "\
Bilingual single-page portfolio generator

Renders an English and an Indonesian copy of a one-page portfolio: hero,
services, work carousel, pricing, FAQ and a contact form. Everything is
optional; a missing file falls back to the stock copy.

Content structure:

  content/
  ├── config.toml      # Branding, locale key, reveal margins, palettes
  └── content.toml     # Copy, projects, plans, FAQ (merged over stock)

Output:

  dist/
  ├── index.html       # English
  └── id/index.html    # Indonesian

Run 'folio-site gen-config' or 'folio-site gen-content' for documented
starting points, and 'folio-site preview --script events.toml' to walk the
page through a scripted visit.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render both locales into the output directory
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Replay an event script against a headless page and render the result
    Preview(PreviewArgs),
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Print the stock content.toml
    GenContent,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let site_content = content::load_content(&cli.source)?;
            let site = Site {
                config: &site_config,
                content: &site_content,
            };
            println!("==> Generating HTML → {}", cli.output.display());
            let pages = generate::generate(&site, &cli.output)?;
            output::print_build_output(&pages);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let site_content = content::load_content(&cli.source)?;
            let config_path = existing(&cli.source, "config.toml");
            let content_path = existing(&cli.source, "content.toml");
            output::print_check_output(
                &site_config,
                &site_content,
                config_path.as_deref(),
                content_path.as_deref(),
            );
            println!("==> Content is valid");
        }
        Command::Preview(args) => {
            let out = args
                .out
                .clone()
                .unwrap_or_else(|| cli.output.join("preview.html"));
            match &args.prefs {
                Some(path) => preview(&cli.source, &args, &out, JsonFileStore::open(path)?)?,
                None => preview(&cli.source, &args, &out, MemoryStore::new())?,
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenContent => {
            print!("{}", content::stock_content_toml());
        }
    }

    Ok(())
}

/// Run the script through a session over `store` and render where it ends.
fn preview<S: PreferenceStore>(
    source: &Path,
    args: &PreviewArgs,
    out: &Path,
    store: S,
) -> Result<(), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    let site_content = content::load_content(source)?;
    let events = match &args.script {
        Some(path) => session::load_script(path)?,
        None => Vec::new(),
    };
    let env = SessionEnv {
        reduced_motion: args.reduced_motion,
        coarse_pointer: args.coarse_pointer,
    };

    let mut page = Session::new(
        &site_config,
        &site_content,
        store,
        RecordingDocument::new(),
        env,
    )?;
    page.run(events)?;
    let state = page.snapshot();
    output::print_preview_output(page.transitions(), &state);

    let site = Site {
        config: &site_config,
        content: &site_content,
    };
    let bytes = generate::write_page(&site, &state, out)?;
    println!("==> Wrote {} ({} bytes)", out.display(), bytes);
    Ok(())
}

/// `dir/name` if it exists.
fn existing(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.exists().then_some(path)
}
