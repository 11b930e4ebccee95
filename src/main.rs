use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use lightgrid::config::{FetchOrdering, ProviderConfig};
use lightgrid::logging::init_tracing;
use lightgrid::settings::FilterExpression;
use lightgrid::{ServerDataProvider, ServerDataProviderFactory};

/// Fetch one sorted, filtered page from a grid endpoint and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "lightgrid", version)]
struct Cli {
    /// Resource URL; may already carry a query string.
    url: String,

    /// Config file (default: ~/.config/lightgrid/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sort expression.
    #[arg(long, value_name = "EXPR")]
    order_by: Option<String>,

    /// Sort descending.
    #[arg(long, requires = "order_by")]
    reverse: bool,

    /// Free-text search.
    #[arg(long, conflicts_with = "field")]
    search: Option<String>,

    /// Field search term; repeat for several fields, order is kept.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    field: Vec<(String, String)>,

    #[arg(long)]
    page_size: Option<u64>,

    /// Zero-based page index.
    #[arg(long)]
    page: Option<u64>,

    /// Override the configured debounce interval.
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Discard responses that arrive after a newer one was committed.
    #[arg(long)]
    latest_request_wins: bool,

    /// POST this JSON document to the resource URL instead of fetching.
    #[arg(long, value_name = "JSON")]
    save: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ProviderConfig::load_from(path)?,
        None => ProviderConfig::load()?,
    };
    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if cli.latest_request_wins {
        config.fetch_ordering = FetchOrdering::LatestRequestWins;
    }

    let factory = ServerDataProviderFactory::new(config)?;
    let provider: ServerDataProvider<Value> = factory.create(cli.url.clone());

    if let Some(document) = &cli.save {
        let model: Value =
            serde_json::from_str(document).context("--save expects a JSON document")?;
        let response = provider.save_model(&model).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    apply_arguments(&provider, &cli);
    provider.settled().await;

    if !provider.is_first_request_complete() {
        bail!(
            "Fetch from '{}' failed; set RUST_LOG=lightgrid=debug for details",
            cli.url
        );
    }

    let output = json!({
        "totalResults": provider.model_item_count(),
        "viewSettings": provider.current_view_settings(),
        "data": provider.grid_model().as_slice(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn apply_arguments(provider: &ServerDataProvider<Value>, cli: &Cli) {
    let mut changed = false;

    if let Some(expression) = &cli.order_by {
        provider.order_by(expression.clone(), cli.reverse);
        changed = true;
    }
    if let Some(search) = &cli.search {
        provider.filter(search.as_str());
        changed = true;
    } else if !cli.field.is_empty() {
        provider.filter(FilterExpression::fields(cli.field.iter().cloned()));
        changed = true;
    }
    if let Some(size) = cli.page_size {
        provider.set_page_size(size);
        changed = true;
    }
    if let Some(index) = cli.page {
        provider.page(index);
        changed = true;
    }

    if !changed {
        provider.refresh();
    }
}

fn parse_field(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{input}'")),
    }
}
