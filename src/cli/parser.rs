use crate::core::export::ExportFormat;
use crate::models::category::Category;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rStudylog
/// CLI application to time study sessions and schedule algorithm reviews with SQLite
#[derive(Parser)]
#[command(
    name = "rstudylog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A study timer CLI: track study time per category and schedule algorithm problem reviews using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the device identity file ("" disables identity)
    #[arg(global = true, long = "identity", value_name = "FILE")]
    pub identity: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database, configuration and device identity
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Show study totals, progress, recent sessions and the problem board
    Status,

    /// List recorded study sessions
    Sessions {
        #[arg(long, short, value_enum, help = "Only sessions of this category")]
        category: Option<Category>,

        #[arg(long, short, help = "Maximum number of rows")]
        limit: Option<usize>,
    },

    /// Show the algorithm problem board
    Problems {
        #[arg(long, help = "Only problems whose review can start today")]
        due: bool,
    },

    /// Interactive timer shell
    Shell,

    /// Delete a session or a problem by id (or unique id prefix)
    Del {
        #[arg(long, value_name = "ID", conflicts_with = "problem", required_unless_present = "problem")]
        session: Option<String>,

        #[arg(long, value_name = "ID")]
        problem: Option<String>,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Export sessions (or problems) of this device
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'p', help = "Export algorithm problems instead of sessions")]
        problems: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// One line typed into the interactive shell.
#[derive(Parser, Debug)]
#[command(name = "shell", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ShellCommand {
    /// Start a study session
    Start {
        #[arg(value_enum)]
        category: Category,
    },
    /// Pause the study session
    Pause,
    /// Resume the study session
    Resume,
    /// Stop and save the study session
    Stop {
        /// Optional description
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        description: Vec<String>,
    },
    /// Set the description of the running session
    Note {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },
    /// Time a first attempt at an algorithm problem
    Solve {
        #[command(subcommand)]
        action: SolveAction,
    },
    /// Time a review of a due problem
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Show timers and totals
    Status,
    /// Show the problem board
    Problems,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum SolveAction {
    Start {
        name: String,
        /// Problem type, e.g. "dp" or "graph"
        category: String,
        #[arg(long)]
        link: Option<String>,
    },
    Pause,
    Resume,
    Stop,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReviewAction {
    Start {
        /// Problem id or unique prefix
        id: String,
    },
    Pause,
    Resume,
    Stop,
}
