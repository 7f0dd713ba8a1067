use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "cliagent")]
#[command(about = "Terminal AI coding agent backed by a local Ollama server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, global = true, help = "Plan file creation without touching the filesystem")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Execute a task with the AI agent")]
    Task {
        #[arg(long, help = "Model to use (default: configured model)")]
        model: Option<String>,

        #[arg(long, help = "Skip the think / plan / implement workflow")]
        no_workflow: bool,

        #[arg(required = true, trailing_var_arg = true, help = "Task description")]
        prompt: Vec<String>,
    },

    #[command(about = "Start an interactive session")]
    Interactive {
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    #[command(about = "List available models")]
    Models {
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    #[command(about = "Show agent status")]
    Status,

    #[command(about = "Create a file directly")]
    Create {
        path: PathBuf,
        content: String,
        #[arg(long, help = "Overwrite if the file exists")]
        overwrite: bool,
    },

    #[command(about = "Replace or append to an existing file")]
    Edit {
        path: PathBuf,
        content: String,
        #[arg(long, help = "Append instead of replacing")]
        append: bool,
    },

    #[command(about = "Print a file")]
    Read { path: PathBuf },

    #[command(about = "List files recursively")]
    List {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    #[command(about = "Delete a file")]
    Delete { path: PathBuf },

    #[command(about = "Fetch a URL and print it as text")]
    Web { url: String },

    #[command(about = "Search the web")]
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },

    #[command(about = "Archive the current session and start fresh")]
    Reset,
}

fn run(cli: Cli) -> Result<()> {
    let config = cli::Config {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Task {
            model,
            no_workflow,
            prompt,
        } => cli::task(prompt, model, !no_workflow, &config),
        Commands::Interactive { model } => cli::interactive(model, &config),
        Commands::Models { model } => cli::models(model, &config),
        Commands::Status => cli::status(&config),
        Commands::Create {
            path,
            content,
            overwrite,
        } => cli::create(&path, &content, overwrite, &config),
        Commands::Edit {
            path,
            content,
            append,
        } => cli::edit(&path, &content, append, &config),
        Commands::Read { path } => cli::read(&path),
        Commands::List { dir } => cli::list(&dir),
        Commands::Delete { path } => cli::delete(&path),
        Commands::Web { url } => cli::web(&url),
        Commands::Search { query } => cli::search(query),
        Commands::Reset => cli::reset(&config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cliagent::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style(format!("✗ {:#}", e)).red());
            ExitCode::FAILURE
        }
    }
}
