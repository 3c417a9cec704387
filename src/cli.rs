use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gitwp",
    version,
    about = "Local WordPress development containers with a shared database and proxy.",
    after_long_help = "Examples:\n  gitwp work --sync\n  gitwp wp plugin list\n  gitwp stop\n\n",
    after_help = "\n"
)]
pub(crate) struct Cli {
    /// Print detailed execution info
    #[arg(long)]
    pub(crate) verbose: bool,

    /// Print what would run, but do not execute
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Colorize output: auto|always|never
    #[arg(long = "color", value_enum)]
    pub(crate) color: Option<gitwp::ColorMode>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Start the environment for the current directory and follow its logs
    Work {
        /// Rebuild the app and proxy images first
        #[arg(long)]
        build: bool,
        /// Pull the production database and rewrite its URLs
        #[arg(long)]
        sync: bool,
    },

    /// Run wp-cli inside the project container
    #[command(disable_help_flag = true)]
    Wp {
        /// Arguments passed through to wp-cli verbatim
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Stop the project container and the shared instances
    Stop,
}
