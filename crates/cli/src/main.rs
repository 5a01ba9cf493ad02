use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use sigeval::commands::{
    canonicalize_command, classify_command, evaluate_command, init_command, list_aliases_command,
    uniqueness_command,
};

/// Evaluation of signature-based function recognition against ground truth.
///
/// This CLI is a thin wrapper around `sigeval-core` (exposed in code as `sigeval_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "sigeval",
    version,
    about = "Score signature-matching output against ground truth",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write `sigeval.json` and create the evaluation directory.
    Init {
        /// Evaluation root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Corpus directory relative to the root (default `target`).
        #[arg(long)]
        target_dir: Option<String>,
    },

    /// Score registered binaries and write a results document.
    Evaluate {
        /// Evaluation root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// One of: ground-truth, crates, no-reference.
        #[arg(long, default_value = "ground-truth")]
        mode: String,

        /// Only evaluate binaries whose identity matches this regex.
        #[arg(long)]
        filter: Option<String>,

        /// Results path (default `<target>/evaluation/results_<mode>.json`).
        #[arg(long)]
        out: Option<String>,

        /// Record every non-matched verdict per binary in the results.
        #[arg(long, default_value_t = false)]
        details: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Build the cross-version uniqueness matrix.
    Uniqueness {
        /// Evaluation root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Recorded match counts (default `<target>/uniqueness_counts.json`).
        #[arg(long)]
        counts: Option<String>,

        /// Output path (default `<target>/evaluation/uniqueness.json`).
        #[arg(long)]
        out: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the canonical forms of a symbol name.
    Canonicalize {
        name: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Classify a reference name against a matched name.
    Classify {
        real: String,
        matched: String,

        /// Evaluation root directory (for configured aliases).
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List pinned alias pairs.
    Aliases {
        /// Evaluation root directory (for configured aliases).
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Init { root, name, target_dir } => init_command(&root, name, target_dir)?,
        Command::Evaluate { root, mode, filter, out, details, json } => {
            evaluate_command(&root, &mode, filter, out, details, json)?
        }
        Command::Uniqueness { root, counts, out, json } => {
            uniqueness_command(&root, counts, out, json)?
        }
        Command::Canonicalize { name, json } => canonicalize_command(&name, json)?,
        Command::Classify { real, matched, root, json } => {
            classify_command(&root, &real, &matched, json)?
        }
        Command::Aliases { root, json } => list_aliases_command(&root, json)?,
    }

    Ok(())
}
