mod commands;
mod context;
mod error;
mod progress;
mod prompts;
mod style;
mod table;
mod theme;

use std::process::ExitCode;

use clap::Parser;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "jns", version, about = "Interactive command-line client for Jenkins")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Configure the Jenkins server connection
    Connect,

    /// List jobs, numbered for later %N references
    List {
        /// Folder job whose children to list
        folder: Option<String>,
    },

    /// Trigger a build and follow its progress
    Build {
        /// Job alias, %N id, name, or URL
        job: String,

        /// Trigger only; do not follow the build
        #[arg(long, short)]
        quiet: bool,

        /// Stream the console log instead of the progress bar
        #[arg(long, short)]
        log: bool,

        /// Build parameter as name=value (repeatable)
        #[arg(long = "param", short)]
        params: Vec<String>,

        /// Analyze the error log with the configured AI provider on failure
        #[arg(long)]
        ai: bool,
    },

    /// Abort a running build
    Abort {
        job: String,

        /// Build number; defaults to the last build
        #[arg(long, short = 'n')]
        build: Option<u32>,
    },

    /// Show job and build information
    Info {
        job: String,

        /// Show one build in full instead of the job summary
        #[arg(long, short = 'n')]
        build: Option<u32>,

        /// Include successful builds only
        #[arg(long)]
        success: bool,

        /// Include failed builds only
        #[arg(long)]
        failed: bool,

        /// Include running builds only
        #[arg(long)]
        running: bool,

        /// Maximum number of builds to list
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Only builds started by the configured user
        #[arg(long)]
        mine: bool,
    },

    /// Show the error tail of a failed build
    Errors {
        job: String,

        /// Build number; defaults to the last failed build
        #[arg(long, short = 'n')]
        build: Option<u32>,

        /// Latest failed build started by the configured user
        #[arg(long)]
        mine: bool,

        /// Summarize the errors with the configured AI provider
        #[arg(long)]
        ai: bool,
    },

    /// Manage job aliases
    Alias {
        #[command(subcommand)]
        command: AliasCommands,
    },

    /// Configure and test the AI provider
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(clap::Subcommand)]
enum AliasCommands {
    /// Map an alias to a job URL or %N id
    Add { alias: String, job: String },
    /// Remove an alias
    Remove { alias: String },
    /// List aliases
    List,
}

#[derive(clap::Subcommand)]
enum AiCommands {
    /// Choose the provider, endpoint, model, and key
    Configure,
    /// Send a canned prompt to verify the configuration
    Test,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", style::error_prefix());
            ExitCode::from(err.exit_code())
        }
    }
}

/// Diagnostics are opt-in via `JNS_LOG` so they never garble the live
/// progress display.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("JNS_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Connect => commands::connect::run(),
        Commands::List { folder } => commands::list::run(folder.as_deref()),
        Commands::Build {
            job,
            quiet,
            log,
            params,
            ai,
        } => commands::build::run(
            &job,
            commands::build::BuildOptions {
                follow: !quiet,
                show_log: log,
                params,
                use_ai: ai,
            },
        ),
        Commands::Abort { job, build } => commands::abort::run(&job, build),
        Commands::Info {
            job,
            build,
            success,
            failed,
            running,
            limit,
            mine,
        } => commands::info::run(
            &job,
            build,
            commands::info::BuildFilter {
                success,
                failed,
                running,
                limit,
                mine,
            },
        ),
        Commands::Errors {
            job,
            build,
            mine,
            ai,
        } => commands::errors::run(&job, build, mine, ai),
        Commands::Alias { command } => match command {
            AliasCommands::Add { alias, job } => commands::alias::add(&alias, &job),
            AliasCommands::Remove { alias } => commands::alias::remove(&alias),
            AliasCommands::List => commands::alias::list(),
        },
        Commands::Ai { command } => match command {
            AiCommands::Configure => commands::ai::configure(),
            AiCommands::Test => commands::ai::test(),
        },
    }
}
