//! CLI command definitions, routing, and tracing setup.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use podlens_core::{DocService, FsSource};
use podlens_shared::{Heading, UsageExample, init_config, load_config};
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// podlens: read Perl POD as Markdown and usage examples.
#[derive(Parser)]
#[command(
    name = "podlens",
    version,
    about = "Render Perl POD as Markdown and extract usage examples.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Render a POD file as Markdown.
    Render {
        /// POD or .pm file, or `-` for stdin.
        input: String,
    },

    /// List the usage examples found in a POD file.
    Examples {
        /// POD or .pm file, or `-` for stdin.
        input: String,

        /// Print JSON instead of Markdown.
        #[arg(long)]
        json: bool,
    },

    /// Print the heading outline of a POD file.
    Outline {
        /// POD or .pm file, or `-` for stdin.
        input: String,

        /// Print JSON instead of an indented list.
        #[arg(long)]
        json: bool,
    },

    /// Look a document up by module name under the configured roots.
    Lookup {
        /// Module name (`Foo::Bar`) or file name relative to a root.
        id: String,

        /// Root directory to search (repeatable). Overrides `[source].roots`.
        #[arg(long)]
        root: Vec<String>,

        /// Print examples instead of the rendered document.
        #[arg(long)]
        examples: bool,

        /// Print JSON (examples only).
        #[arg(long, requires = "examples")]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "podlens=info",
        1 => "podlens=debug",
        _ => "podlens=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render { input } => cmd_render(&input),
        Command::Examples { input, json } => cmd_examples(&input, json),
        Command::Outline { input, json } => cmd_outline(&input, json),
        Command::Lookup {
            id,
            root,
            examples,
            json,
        } => cmd_lookup(&id, &root, examples, json),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_render(input: &str) -> Result<()> {
    let pod = read_input(input)?;
    let markdown = podlens_pod::render(&pod);
    if markdown.is_empty() {
        warn!(input, "no renderable POD found");
    }
    println!("{markdown}");
    Ok(())
}

fn cmd_examples(input: &str, json: bool) -> Result<()> {
    let pod = read_input(input)?;
    let examples = podlens_pod::extract_examples(&pod);
    info!(input, count = examples.len(), "examples extracted");
    print_examples(&examples, json)
}

fn cmd_outline(input: &str, json: bool) -> Result<()> {
    let pod = read_input(input)?;
    let outline = podlens_pod::outline(&pod);
    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        print_outline(&outline);
    }
    Ok(())
}

fn cmd_lookup(id: &str, roots: &[String], examples: bool, json: bool) -> Result<()> {
    let mut config = load_config()?;
    if !roots.is_empty() {
        config.source.roots = roots.to_vec();
    }
    if config.source.roots.is_empty() {
        return Err(eyre!(
            "no source roots configured. Pass --root or set [source].roots in the config file"
        ));
    }

    let source = FsSource::from_config(&config.source);
    let service = DocService::new(source, &config.cache)?;

    info!(id, roots = ?config.source.roots, "looking up document");

    if examples {
        print_examples(&service.examples(id)?, json)?;
    } else {
        let markdown = service.markdown(id)?;
        if markdown.is_empty() {
            warn!(id, "document not found or has no POD");
        }
        println!("{markdown}");
    }

    debug!(stats = ?service.cache_stats(), "cache statistics");
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created config file at {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a file (or stdin for `-`), replacing invalid UTF-8. Perl source
/// files are reduced to their POD regions.
fn read_input(input: &str) -> Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .wrap_err("failed to read stdin")?;
        buf
    } else {
        let path = PathBuf::from(input);
        let bytes =
            std::fs::read(&path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
        if podlens_pod::is_perl_source(&path) {
            return Ok(podlens_pod::pod_regions(&String::from_utf8_lossy(&bytes)));
        }
        bytes
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn print_examples(examples: &[UsageExample], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(examples)?);
        return Ok(());
    }
    if examples.is_empty() {
        println!("No examples found.");
        return Ok(());
    }
    for example in examples {
        println!("## {}", example.title);
        if let Some(description) = &example.description {
            println!();
            println!("{description}");
        }
        println!();
        println!("```{}", example.language);
        println!("{}", example.code);
        println!("```");
        println!();
    }
    Ok(())
}

fn print_outline(outline: &[Heading]) {
    for heading in outline {
        let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
        println!("{indent}- {}", heading.text);
    }
}
