use console::style;

use cliagent::contexts::{SessionStatus, WorkflowResult};

pub fn print_header() {
    println!(
        "{}",
        style(
            "╔════════════════════════════════════════════════════════╗\n\
             ║                    CLIAgent v1.0                       ║\n\
             ║          Terminal AI Coding Agent with Ollama          ║\n\
             ╚════════════════════════════════════════════════════════╝"
        )
        .cyan()
    );
}

pub fn print_success(msg: &str) {
    println!("{}", style(format!("✓ {}", msg)).green());
}

pub fn print_error(msg: &str) {
    eprintln!("{}", style(format!("✗ {}", msg)).red());
}

pub fn print_info(msg: &str) {
    println!("{}", style(format!("ℹ {}", msg)).blue());
}

fn print_section(title: &str, body: &str) {
    println!("\n{}", style(title).cyan().bold());
    println!("{}", body);
}

pub fn print_result(result: &WorkflowResult) {
    if let Some(thinking) = &result.thinking {
        print_section("Thinking:", thinking);
    }
    if let Some(plan) = &result.plan {
        print_section("Plan:", plan);
    }
    print_section("Implementation:", &result.implementation);
    println!();
}

pub fn render_status(status: &SessionStatus) -> String {
    format!(
        "\n╔════════════════════════════════════════╗\n\
         ║         CLIAgent Status                ║\n\
         ╠════════════════════════════════════════╣\n\
         ║ Ollama Host:      {:<20}\n\
         ║ Active Model:     {:<20}\n\
         ║ Models Available: {:<20}\n\
         ║ Files Created:    {:<20}\n\
         ║ Files Modified:   {:<20}\n\
         ║ Messages:         {:<20}\n\
         ╚════════════════════════════════════════╝\n",
        status.endpoint,
        status.model,
        status.models_available,
        status.files_created,
        status.files_modified,
        status.messages,
    )
}

pub fn print_help_commands() {
    println!(
        "\n{}\n  help          - Show this help\n  status        - Show agent status\n  models        - List available models\n  model:<name>  - Switch to a model\n  exit/quit     - Exit the session\n  <prompt>      - Execute a task with AI agent\n",
        style("Available Commands:").cyan()
    );
}
