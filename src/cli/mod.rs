//! CLI interface for Hutara

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Cross-modulated four-oscillator CV voice
#[derive(Parser)]
#[command(name = "hutara")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render output lines to a WAV file
    Render {
        /// Patch file path
        #[arg(short, long, default_value = "hutara.yaml")]
        config: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: f64,

        /// Lines to record, one channel each (sine, saw, triangle, square, mix)
        #[arg(short, long, value_delimiter = ',', default_value = "mix")]
        lines: Vec<String>,
    },

    /// Play the mix line until Ctrl-C
    Play {
        /// Patch file path
        #[arg(short, long, default_value = "hutara.yaml")]
        config: PathBuf,
    },

    /// Print the first output frames
    Probe {
        /// Patch file path
        #[arg(short, long, default_value = "hutara.yaml")]
        config: PathBuf,

        /// Number of samples
        #[arg(short = 'n', long, default_value = "8")]
        samples: usize,

        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Validate a patch file
    Check {
        /// Patch file path
        #[arg(short, long, default_value = "hutara.yaml")]
        config: PathBuf,
    },

    /// Generate an example patch file
    Init,
}
