use anyhow::{Context, Result};
use console::style;
use std::io::{self, Write};
use std::path::Path;

mod display;
mod progress;

use cliagent::clients::{OllamaClient, WebClient};
use cliagent::config::AgentConfig;
use cliagent::contexts::{
    file_manager, Materializer, PlanReconciler, TaskError, TaskOutcome, TaskRunner,
};
use cliagent::data::GenerationBackend;
use cliagent::session_ledger::SessionLedger;
use display::{
    print_error, print_header, print_help_commands, print_info, print_result, print_success,
    render_status,
};
use progress::ProgressIndicator;

#[derive(Clone, Copy)]
pub struct Config {
    pub verbose: bool,
    pub dry_run: bool,
}

const WEB_PREVIEW_CHARS: usize = 500;

fn build_runner(model: Option<&str>, config: &Config) -> Result<TaskRunner<OllamaClient>> {
    let agent_config = AgentConfig::load()?;
    if config.verbose {
        println!(
            "Backend: {} | model: {} | state: {}",
            agent_config.ollama_host,
            model.unwrap_or(&agent_config.default_model),
            agent_config.state_dir.display()
        );
    }

    let mut backend = OllamaClient::from_config(&agent_config)?;
    if let Some(model) = model {
        backend.set_model(model);
    }

    let ledger = SessionLedger::load(&agent_config.state_dir);
    let reconciler = PlanReconciler::home_anchored()?;
    let materializer = Materializer::in_current_dir()?;

    Ok(TaskRunner::new(
        backend,
        ledger,
        reconciler,
        materializer,
        agent_config.state_dir.clone(),
    )
    .with_recent_limit(agent_config.recent_limit)
    .with_dry_run(config.dry_run))
}

fn ensure_backend(runner: &TaskRunner<OllamaClient>) -> Result<()> {
    if runner.backend().is_available() {
        return Ok(());
    }
    anyhow::bail!(
        "Ollama is not running at {}. Start it with: ollama serve",
        runner.backend().endpoint()
    )
}

fn report_outcome(outcome: &TaskOutcome, config: &Config) {
    print_result(&outcome.result);

    match &outcome.report {
        Some(report) => ProgressIndicator::from_report(report).finish(),
        None => {
            if config.dry_run && !outcome.plan.is_empty() {
                println!("{}", style("Planned actions (dry run):").yellow());
                for action in &outcome.plan {
                    println!("  - {}", action.describe());
                }
            }
        }
    }
}

pub fn task(prompt: Vec<String>, model: Option<String>, use_workflow: bool, config: &Config) -> Result<()> {
    print_header();

    let mut runner = build_runner(model.as_deref(), config)?;
    ensure_backend(&runner)?;

    let prompt_text = prompt.join(" ");
    print_info(&format!("Prompt: {}\n", prompt_text));
    if let Some(model) = &model {
        print_info(&format!("Using model: {}\n", model));
    }

    let outcome = runner.execute(&prompt_text, use_workflow)?;
    report_outcome(&outcome, config);
    print_success("Task completed. Session saved.");
    Ok(())
}

pub fn interactive(model: Option<String>, config: &Config) -> Result<()> {
    print_header();

    let mut runner = build_runner(model.as_deref(), config)?;
    ensure_backend(&runner)?;

    println!("{}", render_status(&runner.status()));
    print_info("Type 'exit' to quit, 'help' for commands\n");

    let stdin = io::stdin();
    loop {
        print!("{} ", style("➜").yellow());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = stdin.read_line(&mut line).context("Failed to read user input")?;
        if read == 0 {
            print_success("Session ended");
            break;
        }

        let input = line.trim();
        match input.to_lowercase().as_str() {
            "" => continue,
            "exit" | "quit" => {
                print_success("Goodbye!");
                break;
            }
            "help" => {
                print_help_commands();
                continue;
            }
            "status" => {
                println!("{}", render_status(&runner.status()));
                continue;
            }
            "models" => {
                let models = runner.available_models();
                if models.is_empty() {
                    println!("Available models: None\n");
                } else {
                    println!("Available models: {}\n", models.join(", "));
                }
                continue;
            }
            _ => {}
        }

        if let Some(model_name) = input.strip_prefix("model:") {
            match runner.set_model(model_name.trim()) {
                Ok(()) => print_info(&format!("Model switched to: {}", model_name.trim())),
                Err(e) => print_error(&e.to_string()),
            }
            continue;
        }

        print_info("Processing your request...");
        match runner.execute(input, true) {
            Ok(outcome) => {
                report_outcome(&outcome, config);
                print_success("Task completed!");
            }
            Err(e @ TaskError::BackendUnavailable(_)) => {
                print_error(&format!("{}. Start it with: ollama serve", e));
            }
            Err(e) => print_error(&format!("Error: {}", e)),
        }
    }

    Ok(())
}

pub fn models(model: Option<String>, config: &Config) -> Result<()> {
    print_header();

    let runner = build_runner(model.as_deref(), config)?;
    ensure_backend(&runner)?;

    let available = runner.available_models();
    if available.is_empty() {
        print_error("No models found");
        return Ok(());
    }

    println!("{}", style("Available Models:").cyan());
    for (i, name) in available.iter().enumerate() {
        let marker = if name == runner.backend().model() { " (active)" } else { "" };
        println!("  {}. {}{}", i + 1, style(name).green(), marker);
    }
    Ok(())
}

pub fn status(config: &Config) -> Result<()> {
    print_header();
    let runner = build_runner(None, config)?;
    println!("{}", render_status(&runner.status()));
    Ok(())
}

pub fn create(path: &Path, content: &str, overwrite: bool, config: &Config) -> Result<()> {
    print_header();
    let mut runner = build_runner(None, config)?;
    runner
        .create_file(path, content, overwrite)
        .with_context(|| format!("Failed to create file {}", path.display()))?;
    print_success(&format!("File created: {}", path.display()));
    Ok(())
}

pub fn edit(path: &Path, content: &str, append: bool, config: &Config) -> Result<()> {
    let mut runner = build_runner(None, config)?;
    runner
        .edit_file(path, content, append)
        .with_context(|| format!("Failed to edit file {}", path.display()))?;
    print_success(&format!("File updated: {}", path.display()));
    Ok(())
}

pub fn read(path: &Path) -> Result<()> {
    let content = file_manager::read_file(path)?;
    println!("{}", content);
    Ok(())
}

pub fn list(dir: &Path) -> Result<()> {
    let files = file_manager::list_files(dir)?;
    if files.is_empty() {
        println!("No files found");
    }
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

pub fn delete(path: &Path) -> Result<()> {
    file_manager::delete_file(path)?;
    print_success(&format!("File deleted: {}", path.display()));
    Ok(())
}

pub fn web(url: &str) -> Result<()> {
    print_header();
    let content = WebClient::new()?.fetch(url)?;

    println!(
        "\n{}",
        style(format!("Content ({} chars):", content.chars().count())).cyan()
    );
    if content.chars().count() > WEB_PREVIEW_CHARS {
        let preview: String = content.chars().take(WEB_PREVIEW_CHARS).collect();
        println!("{}...", preview);
    } else {
        println!("{}", content);
    }
    Ok(())
}

pub fn search(query: Vec<String>) -> Result<()> {
    let query = query.join(" ");
    let results = WebClient::new()?.search(&query)?;
    if results.trim().is_empty() {
        println!("No results found");
    } else {
        println!("{}", results);
    }
    Ok(())
}

pub fn reset(config: &Config) -> Result<()> {
    let mut runner = build_runner(None, config)?;
    match runner.reset_session()? {
        Some(archive) => print_success(&format!("Session archived to {}", archive.display())),
        None => print_info("No saved session to archive"),
    }
    print_success("Session reset - starting fresh");
    Ok(())
}
