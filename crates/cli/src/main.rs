//! Volley CLI - Operator command-line interface
//! Lists attack actions, previews their commands, runs them and shows results

mod browser;
mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tabled::Table;

use browser::SystemBrowser;
use render::RunKind;
use volley_core::application::{synthesize, validate, ActionRunner};
use volley_core::domain::{
    ActionDetails, Classification, CommandString, Dispatch, ExecutionRecord,
};
use volley_core::port::id_provider::UuidProvider;
use volley_core::port::time_provider::SystemTimeProvider;
use volley_core::port::{ActionCatalog, CommandTransport};
use volley_infra_system::{ShellTransport, TemplateCatalog};
use volley_sdk::{RemoteTransport, VolleyClient};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9611";
const DEFAULT_TEMPLATE: &str = "~/.volley/template.json";
const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Parser)]
#[command(name = "volley")]
#[command(about = "Volley attack action runner", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Execution service URL
    #[arg(long, global = true, env = "VOLLEY_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Attack template file
    #[arg(long, global = true, env = "VOLLEY_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Base URI for relative web action URLs (overrides the template)
    #[arg(long, global = true, env = "VOLLEY_TARGET_URI")]
    target: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the actions in the template
    List,

    /// Show an action and the command it would run
    Show {
        /// Action ID or name
        action: String,

        /// Group ID or name to search in
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Run an action from the template
    Run {
        /// Action ID or name
        action: String,

        /// Group ID or name to search in
        #[arg(short, long)]
        group: Option<String>,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Run a command line as-is
    Exec {
        /// Command line (full shell syntax)
        command: String,

        #[command(flatten)]
        exec: ExecArgs,
    },

    /// Show execution service status
    Status,
}

#[derive(Args)]
struct ExecArgs {
    /// Run on this machine instead of the execution service
    #[arg(long)]
    local: bool,

    /// Timeout in seconds (1 to 86400)
    #[arg(
        short,
        long,
        default_value = "30",
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS)
    )]
    timeout: u64,

    /// Print the full execution log
    #[arg(short, long)]
    details: bool,

    /// Print the record as JSON
    #[arg(long, conflicts_with = "details")]
    json: bool,
}

fn load_catalog(cli: &Cli) -> Result<TemplateCatalog> {
    let path = shellexpand::tilde(&cli.template).into_owned();
    let catalog = TemplateCatalog::load(&path)
        .with_context(|| format!("Failed to load attack template {}", path))?;
    Ok(catalog.with_default_target_uri(cli.target.clone()))
}

async fn build_runner(cli: &Cli, exec: &ExecArgs) -> Result<ActionRunner> {
    let time_provider = Arc::new(SystemTimeProvider);

    let transport: Arc<dyn CommandTransport> = if exec.local {
        Arc::new(ShellTransport::new(time_provider.clone()))
    } else {
        Arc::new(
            RemoteTransport::connect(&cli.rpc_url)
                .await
                .with_context(|| format!("Failed to create client for {}", cli.rpc_url))?,
        )
    };

    Ok(ActionRunner::new(
        transport,
        Arc::new(SystemBrowser),
        time_provider,
        Arc::new(UuidProvider),
    )
    .with_timeout(Duration::from_secs(exec.timeout)))
}

fn print_record(record: &ExecutionRecord, kind: &RunKind, exec: &ExecArgs) -> Result<ExitCode> {
    if exec.json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        let headline = match record.classification() {
            Classification::Succeeded => "✓ Succeeded".green().bold(),
            Classification::CommandFailure => "✗ Command failed".red().bold(),
            Classification::TransportFailure => "✗ Could not execute".yellow().bold(),
        };
        println!("{}", headline);
        println!();
        println!("{}", render::summary(record, kind));

        if exec.details {
            println!();
            println!("{}", "Execution Log".cyan().bold());
            println!("{}", render::details(record));
        }
    }

    Ok(if record.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn describe(details: &ActionDetails) {
    match details {
        ActionDetails::Web(web) => {
            println!("  {} {} {}", "Request:".bold(), web.method, web.url);
            println!("  {} {}", "Runs On:".bold(), web.execution_mode);
            for (name, value) in &web.headers {
                println!("  {} {}: {}", "Header:".bold(), name, value);
            }
            if let Some(payload) = &web.payload {
                println!("  {} {}", "Payload:".bold(), payload);
            }
        }
        ActionDetails::Shell(shell) => {
            println!("  {}", "Script:".bold());
            for line in shell.script.lines() {
                println!("    {}", line);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::List => {
            let catalog = load_catalog(&cli)?;
            let rows = render::action_rows(catalog.groups());

            println!(
                "{} (version {}, {} actions)",
                "Attack Template".cyan().bold(),
                catalog.version(),
                rows.len()
            );
            if let Some(target) = catalog.default_target_uri() {
                println!("  {} {}", "Default Target:".bold(), target);
            }
            println!();

            if rows.is_empty() {
                println!("{}", "No actions defined".yellow());
            } else {
                println!("{}", Table::new(rows));
            }
        }

        Commands::Show { action, group } => {
            let catalog = load_catalog(&cli)?;
            let action = catalog.find_action(group.as_deref(), action)?;

            println!("{} ({})", action.name.cyan().bold(), action.id);
            if let Some(description) = &action.description {
                println!("  {}", description);
            }
            println!("  {} {}", "Type:".bold(), action.details.kind_label());
            describe(&action.details);
            println!();

            if let Err(e) = validate(&action.details) {
                println!("  {} {}", "✗".red(), e);
                return Ok(ExitCode::FAILURE);
            }
            match synthesize(&action.details, catalog.default_target_uri()) {
                Dispatch::Transport { command, .. } => {
                    println!("{}", "Command Preview:".bold());
                    println!("{}", command);
                }
                Dispatch::Navigate { url, .. } => {
                    println!("{} {}", "Browser URL:".bold(), url);
                }
            }
        }

        Commands::Run {
            action,
            group,
            exec,
        } => {
            let catalog = load_catalog(&cli)?;
            let action = catalog.find_action(group.as_deref(), action)?;
            let runner = build_runner(&cli, exec).await?;

            let dispatch = runner.prepare(&action.details, catalog.default_target_uri())?;
            let kind = RunKind::of(&dispatch);
            if !exec.json {
                println!("{} {}", "Running".cyan().bold(), action.name);
            }

            let record = runner.run_dispatch(dispatch).await;
            return print_record(&record, &kind, exec);
        }

        Commands::Exec { command, exec } => {
            let runner = build_runner(&cli, exec).await?;
            let record = runner.run_command(CommandString::raw(command.as_str())).await?;
            return print_record(&record, &RunKind::Shell, exec);
        }

        Commands::Status => {
            println!("{}", "Execution Service Status".cyan().bold());
            println!();

            let health = match VolleyClient::connect(&cli.rpc_url).await {
                Ok(client) => client.health().await,
                Err(e) => Err(e),
            };
            match health {
                Ok(health) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    println!("  {} {}", "Version:".bold(), health.version);
                    println!(
                        "  {} {} of {} free",
                        "Slots:".bold(),
                        health.available_permits,
                        health.max_concurrent
                    );
                    println!("  {} {} seconds", "Uptime:".bold(), health.uptime_seconds);
                }
                Err(e) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_defaults_to_thirty_seconds() {
        let cli = Cli::try_parse_from(["volley", "exec", "id"]).unwrap();
        match cli.command {
            Commands::Exec { exec, .. } => assert_eq!(exec.timeout, 30),
            _ => panic!("expected exec"),
        }
    }

    #[test]
    fn test_timeout_out_of_range_is_rejected() {
        for bad in ["0", "86401", "18446744073709551615"] {
            let parsed = Cli::try_parse_from(["volley", "exec", "--local", "-t", bad, "id"]);
            assert!(parsed.is_err(), "timeout {} accepted", bad);
        }

        let cli = Cli::try_parse_from(["volley", "run", "probe", "-t", "86400"]).unwrap();
        match cli.command {
            Commands::Run { exec, .. } => assert_eq!(exec.timeout, MAX_TIMEOUT_SECS),
            _ => panic!("expected run"),
        }
    }
}
