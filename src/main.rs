mod bindings;
mod detail;
mod models;
mod network;
mod overview;

use anyhow::Context;
use bindings::{bind_list, bind_status};
use detail::DetailViewModel;
use network::{ApiConfig, MarsApiClient, MarsApiFilter};
use overview::{FetchStatus, OverviewViewModel, PhotoGridAdapter};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Wait until the latest fetch has finished one way or the other
async fn settled(status: &mut watch::Receiver<Option<FetchStatus>>) -> anyhow::Result<FetchStatus> {
    let current = *status
        .wait_for(|s| matches!(s, Some(FetchStatus::Done) | Some(FetchStatus::Error)))
        .await
        .context("Overview stopped before the fetch finished")?;
    current.context("Fetch status missing")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let filter: MarsApiFilter = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => MarsApiFilter::default(),
    };

    info!("🪐 Mars Real Estate ({})", filter);

    let client = MarsApiClient::with_config(ApiConfig::from_env()?)?;
    info!("Listing endpoint: {}", client.endpoint());

    // The view model loads everything as soon as it exists
    let view_model = OverviewViewModel::new(Arc::new(client));
    let mut status = view_model.status();
    let mut outcome = settled(&mut status).await?;

    if filter != MarsApiFilter::ShowAll {
        view_model.trigger_fetch(filter);
        outcome = settled(&mut status).await?;
    }

    if let Some(icon) = bind_status(Some(outcome)) {
        if icon.visible {
            warn!("Status icon: {:?}", icon.glyph);
        }
    }
    if outcome == FetchStatus::Error {
        anyhow::bail!("Failed to load Mars properties");
    }

    let properties = view_model.properties().borrow().clone();
    let mut adapter = PhotoGridAdapter::new();
    bind_list(&mut adapter, Some(properties.as_slice()));

    info!("\n✅ Loaded {} properties\n", adapter.item_count());

    for cell in (0..adapter.item_count()).filter_map(|i| adapter.bind(i)) {
        println!("{}. #{} ({})", cell.position + 1, cell.property.id, cell.property.property_type);
        match &cell.image {
            Some(image) => println!("   Image: {}", image.uri),
            None => println!("   Image: unavailable"),
        }
    }

    // Open the first listing the way a tap on the grid would
    if let Some(first) = adapter.get_item(0) {
        let mut navigate = view_model.navigate_to_selected_property();
        view_model.select_property(Arc::clone(first));

        let selected = navigate.borrow_and_update().clone();
        if let Some(property) = selected {
            let detail = DetailViewModel::new(property);
            println!();
            println!("Selected #{}", detail.selected_property().id);
            println!("   {}", detail.display_type());
            println!("   {}", detail.display_price());
            if let Some(image) = detail.image() {
                println!("   {}", image.uri);
            }
            view_model.acknowledge_selection();
        }
    }

    // Save the listing snapshot
    let json = serde_json::to_string_pretty(&properties.iter().map(|p| p.as_ref()).collect::<Vec<_>>())?;
    tokio::fs::write("realestate.json", json).await?;
    info!("💾 Saved {} properties to realestate.json", properties.len());

    Ok(())
}
