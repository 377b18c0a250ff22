use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use richlint::Result;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "richlint")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Structural validator for the Asana rich text markup dialect", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rich text document against the grammar
    Check {
        /// Path to the markup file (reads stdin when omitted or "-")
        input: Option<PathBuf>,

        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Print the grammar rule table
    Rules {
        /// Output in JSON format
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check { input, json } => richlint::cli::check::run(input.as_deref(), json),

        Commands::Rules { json } => richlint::cli::rules::run(json),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "richlint", &mut io::stdout());
            Ok(())
        }
    }
}
