//! stylefix CLI
//!
//! Rewrites the relative `url()` references of a stylesheet so it keeps
//! working when embedded in another document.
//!
//! Debug features:
//! - `--tokens`: print the token stream instead of rewriting
//! - `--ast`: print the parsed stylesheet instead of rewriting
//! - `-v` or `RUST_LOG=debug`: log every rewritten url to stderr

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use owo_colors::OwoColorize as _;
use stylefix_common::EnvLocation;
use stylefix_css::{QuotePolicy, RewriteOptions, Stylesheet, fix_urls_with_options, tokenize};
use tracing_subscriber::EnvFilter;

/// stylefix: anchor a stylesheet's relative urls at the page that embeds it
#[derive(Parser, Debug)]
#[command(name = "stylefix")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Rewrite a file against the page it will be inlined into
    stylefix theme.css --url https://example.com/docs/index.html

    # Read from stdin, take the page url from the environment
    STYLEFIX_CURRENT_URL=https://example.com/ stylefix - < theme.css

    # Write to a file and keep the original quoting of quoted urls
    stylefix theme.css --url https://example.com/ -o fixed.css --preserve-quotes

    # Inspect how a stylesheet tokenizes
    stylefix --tokens theme.css
"#)]
struct Cli {
    /// Stylesheet to rewrite; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Url of the document the stylesheet will be used in
    #[arg(short, long, value_name = "URL", env = "STYLEFIX_CURRENT_URL")]
    url: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Put the resolved url inside the original quotes of `url("...")`
    /// instead of quoting it a second time
    #[arg(long)]
    preserve_quotes: bool,

    /// Print the token stream and exit
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print the parsed stylesheet and exit
    #[arg(long)]
    ast: bool,

    /// Log each rewritten url
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let css = read_input(cli.path.as_deref())?;

    if cli.tokens {
        let mut listing = String::new();
        for token in tokenize(&css) {
            listing.push_str(&token.to_string());
            listing.push('\n');
        }
        return write_output(cli.output.as_deref(), &listing);
    }

    if cli.ast {
        let stylesheet = Stylesheet::parse(&css);
        return write_output(cli.output.as_deref(), &format!("{stylesheet:#?}\n"));
    }

    let options = RewriteOptions {
        quote_policy: if cli.preserve_quotes {
            QuotePolicy::Preserve
        } else {
            QuotePolicy::Legacy
        },
    };
    let fixed = fix_urls_with_options(&css, cli.url.as_deref(), &EnvLocation::default(), options)
        .context("cannot rewrite stylesheet (pass --url or set STYLEFIX_CURRENT_URL)")?;
    tracing::debug!(
        input = input_name(cli.path.as_deref()),
        url = cli.url.as_deref().unwrap_or("<unset>"),
        policy = ?options.quote_policy,
        "rewrote stylesheet"
    );
    write_output(cli.output.as_deref(), &fixed)
}

fn input_name(path: Option<&str>) -> &str {
    match path {
        None | Some("-") => "<stdin>",
        Some(path) => path,
    }
}

/// Read the stylesheet from `path`, or stdin for `-` and no path.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut css = String::new();
            let _ = io::stdin()
                .read_to_string(&mut css)
                .context("failed to read stylesheet from stdin")?;
            Ok(css)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
    }
}

fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
