use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

/// Convert an image to editable text through an extraction service.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "snaptext", version)]
pub struct Cli {
    /// JPG or PNG image to stage at startup.
    pub image: Option<PathBuf>,

    /// Upload endpoint of the extraction service.
    #[arg(long, env = "SNAPTEXT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Give up on a conversion after this many seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory downloads are saved into.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// RON configuration file (defaults to ./snaptext.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
