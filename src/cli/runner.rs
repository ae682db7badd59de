//! CLI command execution

use super::commands::{Cli, Commands, FilterArgs, OutputFormat};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::filter::{Filter, IssueStatus, Severity};
use crate::http::StoreHttpClient;
use crate::navigator::{Navigator, PageView};
use crate::store::{total_pages, CountEstimator, RestStore};
use crate::types::OptionStringExt;
use std::sync::Arc;
use tracing::info;

/// Executes a parsed CLI invocation
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(&self) -> Result<()> {
        let config = DashboardConfig::from_path(&self.cli.config)?;

        match &self.cli.command {
            Commands::Page { number, filter } => {
                let store = self.store(&config)?;
                let nav = build_navigator(&config, store);
                let first = nav.set_filter(parse_filter(filter)?).await?;
                let view = if *number <= 1 {
                    first
                } else {
                    nav.goto_page(*number).await?
                };
                self.print_view(&view);
            }
            Commands::Last { filter } => {
                let store = self.store(&config)?;
                let nav = build_navigator(&config, store);
                nav.set_filter(parse_filter(filter)?).await?;
                let view = nav.goto_last_page(None).await?;
                self.print_view(&view);
            }
            Commands::Count { filter } => {
                let store = self.store(&config)?;
                let filter = parse_filter(filter)?;
                let count = store.estimate(&config.collection, &filter).await?;
                self.print_count(&config, count);
            }
            Commands::Validate => {
                config.validate()?;
                let store = self.store(&config)?;
                store.health().await?;
                info!("configuration valid, store reachable");
                println!("ok");
            }
        }

        Ok(())
    }

    fn store(&self, config: &DashboardConfig) -> Result<Arc<RestStore>> {
        let http = StoreHttpClient::with_config(config.http_config()?);
        Ok(Arc::new(RestStore::new(http)))
    }

    fn print_view(&self, view: &PageView) {
        match self.cli.format {
            OutputFormat::Json => {
                for record in &view.records {
                    if let Ok(line) = serde_json::to_string(record) {
                        println!("{line}");
                    }
                }
                let footer = serde_json::json!({
                    "page": view.page_number,
                    "records": view.records.len(),
                    "has_more": view.has_more,
                    "has_prev": view.has_prev,
                    "total_pages_hint": view.total_pages_hint,
                });
                println!("{footer}");
            }
            OutputFormat::Pretty => {
                for record in &view.records {
                    let summary = record
                        .fields
                        .get("description")
                        .and_then(|v| v.as_str())
                        .unwrap_or("-");
                    println!("{}  {}  {}", record.id, record.created_at, summary);
                }
                match view.total_pages_hint {
                    Some(total) => println!(
                        "page {} of ~{total} ({} records shown)",
                        view.page_number,
                        view.records.len()
                    ),
                    None => println!(
                        "page {} ({} records shown, more: {})",
                        view.page_number,
                        view.records.len(),
                        view.has_more
                    ),
                }
            }
        }
    }

    fn print_count(&self, config: &DashboardConfig, count: Option<u64>) {
        match self.cli.format {
            OutputFormat::Json => {
                let pages = count.map(|c| total_pages(c, config.page_size));
                let line = serde_json::json!({ "count": count, "pages": pages });
                println!("{line}");
            }
            OutputFormat::Pretty => match count {
                Some(c) => println!(
                    "~{c} records, ~{} pages of {}",
                    total_pages(c, config.page_size),
                    config.page_size
                ),
                None => println!("no estimate available"),
            },
        }
    }
}

fn build_navigator(config: &DashboardConfig, store: Arc<RestStore>) -> Navigator {
    Navigator::new(
        store.clone(),
        config.collection.clone(),
        config.navigator_config(),
    )
    .with_estimator(store)
}

/// Translate CLI filter flags into the typed filter
fn parse_filter(args: &FilterArgs) -> Result<Filter> {
    let mut filter = Filter::new();

    if let Some(issue_type) = &args.issue_type {
        filter = filter.with_issue_type(issue_type);
    }
    if let Some(severity) = &args.severity {
        filter = filter.with_severity(parse_severity(severity)?);
    }
    if let Some(entity) = &args.entity {
        filter = filter.with_entity(entity);
    }
    if let Some(status) = &args.status {
        filter = filter.with_status(parse_status(status)?);
    }
    if let Some(run_id) = args.run_id.clone().none_if_empty() {
        filter = filter.with_run_id(run_id);
    }
    if let Some(search) = args.search.clone().none_if_empty() {
        filter = filter.with_search(search);
    }

    Ok(filter)
}

fn parse_severity(value: &str) -> Result<Severity> {
    match value.to_lowercase().as_str() {
        "low" => Ok(Severity::Low),
        "medium" => Ok(Severity::Medium),
        "high" => Ok(Severity::High),
        "critical" => Ok(Severity::Critical),
        other => Err(Error::config(format!(
            "unknown severity '{other}' (expected low, medium, high, critical)"
        ))),
    }
}

fn parse_status(value: &str) -> Result<IssueStatus> {
    match value.to_lowercase().as_str() {
        "open" => Ok(IssueStatus::Open),
        "acknowledged" => Ok(IssueStatus::Acknowledged),
        "resolved" => Ok(IssueStatus::Resolved),
        other => Err(Error::config(format!(
            "unknown status '{other}' (expected open, acknowledged, resolved)"
        ))),
    }
}
