use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use groovy_runner::commands;
use groovy_runner::Harness;

/// Compile and execute Groovy scripts through version-isolated runtimes
#[derive(Parser)]
#[command(name = "groovy-runner")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    /// Local runtime artifact repository (<repo>/<version>/ holds jars)
    #[arg(long, global = true)]
    repository: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a script given as a URL, file path, or inline text
    Execute {
        /// Script source; classified as URL, existing file, or inline body
        source: String,

        /// Runtime version to execute with (defaults to the configured default)
        #[arg(short = 'v', long = "version")]
        runtime: Option<String>,
    },
    /// Compile script sources to class output
    Compile {
        /// Script source files
        sources: Vec<PathBuf>,

        /// Target directory for compiled output
        #[arg(short, long)]
        output: PathBuf,

        /// Runtime version to compile with
        #[arg(short = 'v', long = "version")]
        runtime: Option<String>,

        /// Extra compile-classpath entries, isolated per compiler
        #[arg(long = "classpath")]
        classpath: Vec<PathBuf>,
    },
    /// Generate Java stub skeletons for script sources
    Stubs {
        /// Script source files
        sources: Vec<PathBuf>,

        /// Target directory for generated stubs
        #[arg(short, long)]
        output: PathBuf,

        /// Runtime version to parse with
        #[arg(short = 'v', long = "version")]
        runtime: Option<String>,

        /// Number of non-fatal diagnostics tolerated before aborting
        #[arg(long, default_value_t = 0)]
        tolerance: usize,
    },
    /// Open an interactive shell on a runtime
    Shell {
        /// Runtime version to open
        #[arg(short = 'v', long = "version")]
        runtime: Option<String>,

        /// Use the console surface (banner and prompt) instead of the shell
        #[arg(long)]
        console: bool,
    },
    /// List the runtime versions this build knows about
    Versions {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let harness = Harness::new(cli.repository.clone());

    match cli.command {
        Commands::Execute { source, runtime } => {
            commands::execute_command(&harness, &source, runtime.as_deref())
        }
        Commands::Compile {
            sources,
            output,
            runtime,
            classpath,
        } => commands::compile_command(&harness, &sources, output, runtime.as_deref(), &classpath),
        Commands::Stubs {
            sources,
            output,
            runtime,
            tolerance,
        } => commands::stubs_command(&harness, &sources, output, runtime.as_deref(), tolerance),
        Commands::Shell { runtime, console } => {
            commands::shell_command(&harness, runtime.as_deref(), console)
        }
        Commands::Versions { json } => commands::versions_command(&harness, json),
    }
}
