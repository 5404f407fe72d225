//! Public catalog commands: health, list, show, and search.

use anyhow::{Context, Result};
use clap::Subcommand;
use client::AppStoreClient;
use shared::config::Config;
use shared::models::{AppListQuery, AppRecord};

use super::connect;

#[derive(Subcommand, Debug)]
pub enum AppsCommand {
    /// List catalog entries
    List {
        /// Page number to request
        #[arg(long)]
        page: Option<u32>,

        /// Number of entries per page
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show a single catalog entry
    Show {
        /// Identifier of the app
        id: String,
    },
    /// Search the catalog by name or description
    Search {
        /// Search text (at least two characters)
        query: String,
    },
}

pub async fn run(config: &Config, command: AppsCommand) -> Result<()> {
    let client = connect(config);
    match command {
        AppsCommand::List { page, page_size } => {
            let query = AppListQuery {
                query: None,
                page,
                page_size,
            };
            let apps = client
                .list_apps(&query)
                .await
                .context("failed to list apps")?;
            print_listing(&apps, "No apps published yet.");
        }
        AppsCommand::Show { id } => show(&client, &id).await?,
        AppsCommand::Search { query } => {
            let search = AppListQuery::search(&query)?;
            let apps = client
                .list_apps(&search)
                .await
                .context("search failed")?;
            print_listing(&apps, &format!("No apps match \"{}\".", query.trim()));
        }
    }
    Ok(())
}

pub async fn health(config: &Config) -> Result<()> {
    let client = connect(config);
    let payload = client
        .health()
        .await
        .with_context(|| format!("backend at {} is unreachable", client.base_url()))?;
    println!("Backend at {} is healthy.", client.base_url());
    if !payload.is_null() {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

async fn show(client: &AppStoreClient, id: &str) -> Result<()> {
    let app = client
        .get_app(id)
        .await
        .with_context(|| format!("failed to load app {id}"))?;

    println!("{}", app.display_name());
    println!("by {}", app.display_author());
    if let Some(version) = &app.version {
        println!("version: {version}");
    }
    if let Some(category) = &app.category {
        println!("category: {category}");
    }
    println!();
    println!("{}", app.display_description());
    if let Some(url) = &app.download_url {
        println!();
        println!("download: {url}");
    }
    Ok(())
}

/// Prints one entry per line as `id  name  summary`.
pub fn print_listing(apps: &[AppRecord], empty: &str) {
    if apps.is_empty() {
        println!("{empty}");
        return;
    }
    for app in apps {
        println!(
            "{:<10} {:<28} {}",
            app.id.as_deref().unwrap_or("-"),
            app.display_name(),
            app.display_summary()
        );
    }
}
