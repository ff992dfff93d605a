//! CLI command definitions

use clap::Parser;
use demeter_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for demeter
#[derive(Parser, Debug)]
#[command(name = "demeter")]
#[command(author, version, about = "Multilingual agricultural assistant")]
#[command(long_about = r#"
Demeter answers farming questions in your own language. Each question is
classified, routed to a specialist agent (crop, market, risk, pest or
finance) and the answer is translated back.

Configuration files are loaded from (in priority order):
1. DEMETER_* environment variables
2. --config <path>     Explicit config file
3. ./demeter.toml      Project-level config
4. ~/.config/demeter/config.toml   Global config

Example:
  demeter "What crop should I grow with pH 6.5 and 200mm rainfall?"
  demeter --context '{"area": 2}' "Which government schemes can I get?"
  demeter --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub query: Option<String>,

    /// Extra context as a JSON object, e.g. '{"location": "Nashik"}'
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Read extra context from a JSON file
    #[arg(long, value_name = "PATH", conflicts_with = "context")]
    pub context_file: Option<PathBuf>,

    /// Output format: answer, full or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Empty the translation and response caches, then exit unless a query is given
    #[arg(long)]
    pub clear_cache: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
