use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The rendered sidebar and editor
    Screen,
    Markdown,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "jotter", bin_name = "jotter", version)]
#[command(about = "A terminal notebook of pages and blocks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an editing script and print the result
    #[command(display_order = 1)]
    Script {
        /// Script file; reads stdin when omitted or `-`
        file: Option<PathBuf>,

        /// What `print` and the final output show
        #[arg(long, value_enum, default_value_t = OutputFormat::Screen)]
        format: OutputFormat,
    },

    /// Print the starting workspace
    #[command(display_order = 2)]
    Export {
        #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },

    /// Get or set configuration
    #[command(display_order = 3)]
    Config {
        /// Configuration key (e.g., sidebar_open)
        key: Option<String>,

        /// Value to set
        value: Option<String>,
    },
}
