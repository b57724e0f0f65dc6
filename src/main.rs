//! CLI entry point for sentinel

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use sentinel::{
    JsonLinesFormatter, OutputConfig, ScanError, ScanSummary, StreamingFormatter, StreamingOutput,
    StreamingWalker, WalkerConfig,
};
use tracing::Level;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to color a stream based on mode, environment and
/// whether that stream is a terminal.
fn should_use_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            is_terminal
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(about = "Print a directory tree, labelling binary files from their headers")]
#[command(version)]
struct Args {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Skip entries with this exact name (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "NAME")]
    ignore: Vec<String>,

    /// Do not skip .git and node_modules
    #[arg(long = "no-default-ignores")]
    no_default_ignores: bool,

    /// Descend only N levels deep
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// List files without reading their headers
    #[arg(long = "no-sniff")]
    no_sniff: bool,

    /// Output one JSON object per line
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn walker_config(&self) -> WalkerConfig {
        let mut ignored_names = if self.no_default_ignores {
            Vec::new()
        } else {
            WalkerConfig::default().ignored_names
        };
        ignored_names.extend(self.ignore.iter().cloned());

        WalkerConfig {
            ignored_names,
            max_depth: self.level,
            sniff: !self.no_sniff,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run<O: StreamingOutput>(
    walker: &StreamingWalker,
    args: &Args,
    output: &mut O,
) -> Result<ScanSummary, ScanError> {
    walker.walk_streaming(&args.path, output)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let walker = StreamingWalker::new(args.walker_config());
    tracing::debug!("walker config: {:?}", walker.config());

    let result = if args.json {
        run(&walker, &args, &mut JsonLinesFormatter::stdout())
    } else {
        let output_config = OutputConfig {
            use_color: should_use_color(args.color, std::io::stdout().is_terminal()),
            error_color: should_use_color(args.color, std::io::stderr().is_terminal()),
            ..Default::default()
        };
        run(&walker, &args, &mut StreamingFormatter::new(output_config))
    };

    match result {
        Ok(summary) => {
            tracing::debug!("scan finished: {:?}", summary);
        }
        Err(e) => {
            eprintln!("sentinel: {}", e);
            process::exit(1);
        }
    }
}
