pub mod data;
pub mod service;
pub mod ui;
use crate::data::config::Config;
use crate::data::resume_listing::{load_listings, ResumeListing};
use crate::service::marketplace::MarketplaceService;
use crate::service::render_worker::RenderWorker;
use crate::ui::{explore::ExplorePage, ResumeServices, UIData};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
#[macro_use]
extern crate log;

use dioxus::prelude::*;
use once_cell::sync::OnceCell;

const STYLE: &str = include_str!("ui/style.css");

// Set once in main() before the window opens
static UI_DATA: OnceCell<UIData> = OnceCell::new();

#[derive(Parser, Debug)]
#[command(name = "resume-explorer", about = "Browse the résumés listed on the marketplace")]
struct Args {
    /// JSON file with the listings to show
    #[arg(long)]
    listings: Option<PathBuf>,
    /// Base URL of the document service
    #[arg(long)]
    service_url: Option<String>,
    /// pdfium shared library to use instead of the system one
    #[arg(long)]
    pdfium: Option<PathBuf>,
    /// Write the resulting configuration back to the config file
    #[arg(long)]
    save_config: bool,
}

/** The main function.

It does the following in order:
 - Initialises logging (`env_logger`).
 - Loads [`Config`](crate::data::config) and applies the command line overrides
 - Loads the listings shown on the Explore page
 - Starts the document service client and the PDF render worker
 - Launches [`app`](crate::app) which opens the dioxus desktop window.
*/
fn main() -> Result<()> {
    env_logger::init();
    info!("Starting up resume explorer. Hello!");

    let args = Args::parse();
    let mut cfg = Config::load();
    apply_overrides(&mut cfg, &args);
    if args.save_config {
        cfg.save().context("Couldn't save configuration")?;
    }

    let listings: Vec<ResumeListing> = match &cfg.listings_path {
        Some(path) => load_listings(path)?,
        None => {
            warn!("No listings file configured, nothing to explore");
            Vec::new()
        }
    };

    let documents = MarketplaceService::new(&cfg.service_url, cfg.request_timeout)
        .with_context(|| format!("Invalid service URL '{}'", cfg.service_url))?;
    let services = ResumeServices {
        documents: Arc::new(documents),
        renderer: RenderWorker::global(cfg.pdfium_library.as_deref()),
    };
    UI_DATA
        .set(UIData::new(services, listings))
        .map_err(|_| anyhow!("UI data was already initialised"))?;

    dioxus::launch(app);
    Ok(())
}

fn apply_overrides(cfg: &mut Config, args: &Args) {
    if let Some(listings) = &args.listings {
        cfg.listings_path = Some(listings.clone());
    }
    if let Some(service_url) = &args.service_url {
        cfg.service_url = service_url.clone();
    }
    if let Some(pdfium) = &args.pdfium {
        cfg.pdfium_library = Some(pdfium.clone());
    }
}

/// dioxus
fn app() -> Element {
    match UI_DATA.get() {
        Some(ui_data) => rsx! {
            style { {STYLE} }
            ExplorePage { ui_data: ui_data.clone() }
        },
        None => rsx! {
            p { "Resume explorer wasn't initialised" }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_override_config_from_args() {
        let args = Args::parse_from([
            "resume-explorer",
            "--listings",
            "/tmp/listings.json",
            "--service-url",
            "http://10.1.1.1:5000",
        ]);
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, &args);

        assert_eq!(cfg.listings_path, Some(PathBuf::from("/tmp/listings.json")));
        assert_eq!(cfg.service_url, "http://10.1.1.1:5000");
        assert_eq!(cfg.pdfium_library, None);
        assert!(!args.save_config);
    }

    #[test]
    fn should_keep_config_without_args() {
        let args = Args::parse_from(["resume-explorer"]);
        let mut cfg = Config::default();
        apply_overrides(&mut cfg, &args);
        assert_eq!(cfg, Config::default());
    }
}
