//! Telecom IMS CLI - inventory data access from the command line
//!
//! Runs reads and writes through the same context the library exposes, in
//! whichever data mode is currently saved.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use telecom_ims::config::{ClientConfig, CliArgs, Commands, ModeAction};
use telecom_ims::error::{ImsError, Result};
use telecom_ims::export::export_modems;
use telecom_ims::mode::indicator_text;
use telecom_ims::notify::ConsoleNotifier;
use telecom_ims::query::{Mutation, Query};
use telecom_ims::AppContext;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // RUST_LOG wins over -v
    let level = match args.verbose {
        0 => "error",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    let config = ClientConfig::from_cli(&args);
    let ctx = AppContext::from_config(&config, Arc::new(ConsoleNotifier))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| ImsError::config(format!("Failed to create runtime: {}", e)))?;

    rt.block_on(handle_command(&ctx, args.command))
}

async fn handle_command(ctx: &AppContext, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Mode { action } => cmd_mode(ctx, action),
        Commands::List { resource, filters } => {
            report(ctx.list::<Value>(resource, filters.to_params(resource))).await
        }
        Commands::Get { resource, id } => report(ctx.record::<Value>(resource, &id)).await,
        Commands::Stats => report(ctx.dashboard_stats()).await,
        Commands::Activities => report(ctx.recent_activities()).await,
        Commands::Alerts => report(ctx.dashboard_alerts()).await,
        Commands::SlaAlerts => report(ctx.sla_alerts()).await,
        Commands::Search { query } => report(ctx.global_search(&query)).await,
        Commands::Export { dir } => cmd_export(ctx, &dir).await,
        Commands::Create { resource, data } => {
            write(ctx.create(resource), parse_payload(data.as_deref())?).await
        }
        Commands::Update { resource, id, data } => {
            write(ctx.update(resource, &id), parse_payload(data.as_deref())?).await
        }
        Commands::Delete { resource, id } => write(ctx.delete(resource, &id), None).await,
        Commands::MarkRead { id } => write(ctx.mark_alert_read(&id), None).await,
        Commands::Login { token } => cmd_login(ctx, Some(&token)),
        Commands::Logout => cmd_login(ctx, None),
    }
}

fn cmd_mode(ctx: &AppContext, action: ModeAction) -> Result<ExitCode> {
    match action {
        ModeAction::Show => {}
        ModeAction::Set { mode } => ctx.set_mode(mode.into())?,
        ModeAction::Toggle => {
            ctx.toggle_mode()?;
        }
    }
    let mode = ctx.mode();
    println!("{} ({})", mode, indicator_text(mode));
    Ok(ExitCode::SUCCESS)
}

async fn cmd_export(ctx: &AppContext, dir: &Path) -> Result<ExitCode> {
    match export_modems(ctx, dir).await {
        Ok(outcome) => {
            println!("{}", outcome.path.display());
            Ok(ExitCode::SUCCESS)
        }
        // already reported by the notifier
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

fn cmd_login(ctx: &AppContext, token: Option<&str>) -> Result<ExitCode> {
    let client = ctx
        .api_client()
        .ok_or_else(|| ImsError::config("no live API client configured"))?;
    match token {
        Some(token) => {
            client.set_auth_token(token)?;
            println!("Token saved");
        }
        None => {
            client.clear_auth_token()?;
            println!("Token cleared");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_payload(data: Option<&str>) -> Result<Option<Value>> {
    data.map(serde_json::from_str).transpose().map_err(Into::into)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn report<T>(query: Query<T>) -> Result<ExitCode>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    let state = query.settled().await;
    if state.error.is_some() {
        return Ok(ExitCode::FAILURE);
    }
    print_json(&state.data)?;
    Ok(ExitCode::SUCCESS)
}

async fn write(mutation: Mutation<Value>, payload: Option<Value>) -> Result<ExitCode> {
    match mutation.invoke(payload).await {
        Ok(data) => {
            print_json(&data)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

