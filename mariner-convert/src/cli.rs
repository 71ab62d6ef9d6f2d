use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mariner-convert")]
#[command(about = "Convert a Mariner 4 settings folder into Mariner 5 settings")]
pub struct Cli {
    /// Mariner 4 home path (IR4_HOME) as written in collection baseDirectory values.
    pub old_home: String,
    /// Mariner 5 home path (IR5_HOME) to substitute.
    pub new_home: String,
    /// Existing Mariner 4 settings folder.
    pub input: PathBuf,
    /// Folder that receives the converted settings.
    pub output: PathBuf,
    /// Stop at the first file that fails instead of continuing.
    #[arg(long)]
    pub strict: bool,
    /// Upper-case lower-case element ids in dbwatcher list.xml instead of copying it.
    #[arg(long)]
    pub uppercase_list_ids: bool,
    /// Show what would be written without touching the output folder.
    #[arg(long)]
    pub dry_run: bool,
    /// Optional dbwatcher query mappings TOML. Defaults to the embedded table.
    #[arg(long)]
    pub mappings_file: Option<PathBuf>,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the summary line.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
