//! CLI definitions using clap.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use flagprobe::capability::Capability;
use flagprobe::util::config::project_state_path;
use flagprobe::util::shell::{ColorChoice, Shell};

/// flagprobe - find the compiler flags your toolchain actually accepts
#[derive(Parser)]
#[command(name = "flagprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for check results
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Flag state file (defaults to .flagprobe/flags.toml)
    #[arg(long, global = true, env = "FLAGPROBE_STATE")]
    pub state: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn shell(&self) -> Shell {
        Shell::from_flags(
            self.quiet,
            self.verbose,
            self.color,
            self.message_format == MessageFormat::Json,
        )
    }

    pub fn project_root(&self) -> Result<PathBuf> {
        std::env::current_dir().context("failed to determine current directory")
    }

    pub fn state_path(&self, project_root: &Path) -> PathBuf {
        self.state
            .clone()
            .unwrap_or_else(|| project_state_path(project_root))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a single capability and record the working flags
    Check(CheckArgs),

    /// Probe every capability listed in a requests file
    Configure(ConfigureArgs),

    /// Show the recorded flag buckets
    Flags(FlagsArgs),

    /// Show the detected toolchain
    Toolchain,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Capability to probe (warn-all, warn-extra, decl-after-stmt, ignore-warning, pthread)
    pub capability: Capability,

    /// Treat the warning as an error
    #[arg(long)]
    pub error: bool,

    /// Profile that receives the flags
    #[arg(long, value_name = "NAME")]
    pub store: Option<String>,

    /// Target language (c, c++); repeatable, defaults to both
    #[arg(long = "lang", value_name = "LANG")]
    pub langs: Vec<String>,

    /// Candidate flag for ignore-warning; repeatable
    #[arg(long = "flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub flags: Vec<String>,

    /// Probe without saving the result
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Requests file (defaults to .flagprobe/requests.toml)
    #[arg(long, value_name = "FILE")]
    pub requests: Option<PathBuf>,

    /// Probe without saving the result
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Only show buckets of this profile
    #[arg(long, value_name = "NAME")]
    pub store: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
