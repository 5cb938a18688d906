// Wed Jan 15 2026 - Alex

use crate::config::Config;
use crate::output::OutputFormat;
use crate::utils::parse_u32;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sigmatch")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Relocation-aware MIPS function signature scanner", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Raise the log level, once per flag.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find signatures in a binary image and print the recovered symbols.
    Scan(ScanArgs),
    /// Load signature files and summarise them.
    Info(InfoArgs),
    /// List likely function start offsets in a binary image.
    Candidates(CandidatesArgs),
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Binary image (.z64, .v64, .n64 or a raw RAM dump).
    pub binary: Option<PathBuf>,

    /// Signature file or directory; `.json` files are JSON, anything else is
    /// sig_v1 text. Directories are searched recursively.
    #[arg(short, long = "signatures", num_args = 1..)]
    pub signatures: Vec<PathBuf>,

    /// JSON config file; flags given here take precedence.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Test every word-aligned offset, not only likely function starts.
    #[arg(long)]
    pub thorough: bool,

    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Address the first byte after the header maps to.
    #[arg(long, value_parser = parse_u32)]
    pub base: Option<u32>,

    #[arg(long, value_parser = parse_u32)]
    pub header_size: Option<u32>,

    #[arg(short, long, value_parser = ["pj64", "text", "json"])]
    pub format: Option<String>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub no_progress: bool,

    /// Refuse to scan if any signature record was rejected.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[arg(required = true)]
    pub signatures: Vec<PathBuf>,

    /// List every signature, not just the totals.
    #[arg(long)]
    pub list: bool,

    /// Write the merged database to this file as sig_v1 text.
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CandidatesArgs {
    pub binary: PathBuf,

    #[arg(long, value_parser = parse_u32, default_value = "0x80000000")]
    pub base: u32,

    #[arg(long, value_parser = parse_u32, default_value = "0")]
    pub header_size: u32,

    /// Only print the first N offsets.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl ScanArgs {
    /// Lay the command line over `config`.
    pub fn apply(&self, mut config: Config) -> Result<Config, String> {
        if let Some(binary) = &self.binary {
            config.binary = Some(binary.clone());
        }
        if !self.signatures.is_empty() {
            config.signature_files = self.signatures.clone();
        }
        if self.thorough {
            config.thorough = true;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(base) = self.base {
            config.base_address = base;
        }
        if let Some(header_size) = self.header_size {
            config.header_size = header_size;
        }
        if let Some(format) = &self.format {
            config.output_format = format.parse::<OutputFormat>().map_err(|e| e.to_string())?;
        }
        if let Some(output) = &self.output {
            config.output_file = Some(output.clone());
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if self.strict {
            config.allow_partial_database = false;
        }
        Ok(config)
    }
}
