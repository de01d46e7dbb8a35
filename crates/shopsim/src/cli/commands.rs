use super::handlers;
use super::logging;
use super::setup::{Cli, Commands};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use shopsimapp::init::{initialize, ShopContext};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = initialize(cli.data.clone()).context("failed to initialize data directory")?;
    tracing::info!(data_dir = %ctx.data_dir.display(), "using data directory");

    if matches!(cli.command, Commands::Config) {
        return print_json(&handlers::show_config(&ctx));
    }

    ctx.store
        .load_all()
        .with_context(|| format!("failed to load data from {}", ctx.data_dir.display()))?;

    let output = dispatch(&cli.command, &ctx)?;
    print_json(&output)?;

    if matches!(cli.command, Commands::Add { .. } | Commands::Remove { .. }) {
        flush(&ctx)?;
    }
    Ok(())
}

fn dispatch(command: &Commands, ctx: &ShopContext) -> Result<Value> {
    match command {
        Commands::List { kind } => handlers::list(&ctx.store, *kind),
        Commands::Show { kind, id } => handlers::show(&ctx.store, *kind, *id),
        Commands::Add { kind, json } => handlers::add(&ctx.store, *kind, json),
        Commands::Remove { kind, id } => handlers::remove(&ctx.store, *kind, *id),
        Commands::ReceiptPath { id } => handlers::receipt_path(&ctx.store, *id),
        Commands::Check => handlers::check(&ctx.store),
        Commands::Flush => flush(ctx),
        Commands::Config => Ok(handlers::show_config(ctx)),
    }
}

fn flush(ctx: &ShopContext) -> Result<Value> {
    let report = ctx.store.save_all().context("failed to save data")?;
    if report.records_failed > 0 {
        tracing::warn!(failed = report.records_failed, "some records could not be saved");
    }
    Ok(serde_json::to_value(report)?)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
