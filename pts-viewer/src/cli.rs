use std::path::PathBuf;

use clap::Parser;

/// Command line of the `pts-viewer` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "pts-viewer")]
#[command(author, version, about = "Interactive terminal viewer for PTS point files", long_about = None)]
pub struct Cli {
    /// Point file: one "x y z" or "x y z u v w" record per line
    #[arg(value_name = "PTS_FILE")]
    pub pts_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
