use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fwcheck",
    about = "Check if there are any firmware updates available for this computer",
    long_about = "Check if there are any firmware updates available for this computer. \
Consults both /usr/sbin/softwareupdate and the Apple Support firmware table at \
http://support.apple.com/en-us/HT201518.\n\n\
Exit status: 0 no update, 10 update found, 2 hardware profile incomplete, 1 other errors.",
    version,
    disable_version_flag = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print version information and quit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Activate debug mode; extra information is displayed during runtime
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Prevent logs from being written to files
    #[arg(short = 'n', long, global = true)]
    pub no_log: bool,

    /// Redirect log output to this file
    #[arg(short = 'l', long, value_name = "LOG", global = true)]
    pub log_dest: Option<PathBuf>,

    /// Read configuration from this file only, ignoring system and user config
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look for firmware updates (default)
    Check,

    /// Fetch and print the parsed firmware reference table
    Table {
        /// Only show rows for this model identifier (e.g., iMac14,1)
        #[arg(long)]
        model: Option<String>,
    },

    /// Show the hardware profile fields used for the check
    Profile,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (auto-detected if omitted)
        shell: Option<Shell>,
    },
}

/// Print shell completions to stdout.
pub fn print_completions(shell: Option<Shell>) {
    let shell = shell.or_else(Shell::from_env).unwrap_or_else(|| {
        eprintln!(
            "Could not detect shell. Specify one: fwcheck completions bash|zsh|fish|elvish|powershell"
        );
        std::process::exit(1);
    });
    clap_complete::generate(shell, &mut Cli::command(), "fwcheck", &mut std::io::stdout());
}
