use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use homedir::my_home;

use crate::{
    app::AppService,
    cards::CardsCsv,
    catalog::{CatalogCsv, CatalogReader, RemoteCatalog},
    config::Config,
    ranking::{FallbackController, RankingPipeline},
    search::SearchService,
    storage::BackendLocal,
};

pub const CATALOG_FILE: &str = "catalog.csv";
pub const CARDS_FILE: &str = "cards.csv";

/// Wires configuration, storage and the search stack together.
pub struct AppFactory;

impl AppFactory {
    /// Builds the service for the base directory in `paths`.
    ///
    /// `SHOPFIND_CATALOG_ADDR` overrides `catalog.remote_addr` from the config.
    pub fn create_app_service(paths: &AppPaths) -> Result<AppService> {
        let store = BackendLocal::new(&paths.base_path)
            .context("Failed to create application base directory")?;
        let mut config = Config::load_with(&store)?;

        if let Ok(addr) = std::env::var("SHOPFIND_CATALOG_ADDR") {
            let addr = addr.trim().to_string();
            if !addr.is_empty() {
                config.catalog.remote_addr = Some(addr);
                config.validate()?;
            }
        }

        Self::build(config, store)
    }

    /// Builds the service from an already loaded config.
    pub fn build(config: Config, store: BackendLocal) -> Result<AppService> {
        let catalog = CatalogCsv::open(store.clone(), CATALOG_FILE)?;
        let cards = CardsCsv::open(store, CARDS_FILE)?;

        let controller = Self::create_controller(&config, &catalog)?;
        let search = SearchService::new(controller, &config.search);

        Ok(AppService::new(config, catalog, cards, search))
    }

    /// With a remote catalog, the remote daemon is the primary source and the
    /// local file the fallback. Otherwise the file is primary and a snapshot
    /// taken now is the fallback.
    fn create_controller(config: &Config, catalog: &CatalogCsv) -> Result<FallbackController> {
        let pipeline = RankingPipeline::from_config(&config.search)?;

        let (primary, fallback): (Arc<dyn CatalogReader>, Arc<dyn CatalogReader>) =
            match config.catalog.remote_addr {
                Some(ref addr) => {
                    log::info!("Using remote catalog: {addr}");
                    let remote = RemoteCatalog::new(
                        addr,
                        Duration::from_secs(config.catalog.remote_timeout_secs),
                    );
                    (Arc::new(remote), Arc::new(catalog.clone()))
                }
                None => {
                    let snapshot = catalog.snapshot()?;
                    log::debug!("catalog snapshot holds {} products", snapshot.len());
                    (Arc::new(catalog.clone()), Arc::new(snapshot))
                }
            };

        Ok(FallbackController::new(primary, fallback, pipeline))
    }

    pub fn get_paths() -> Result<AppPaths> {
        Ok(AppPaths {
            base_path: Self::get_base_path()?,
        })
    }

    fn get_base_path() -> Result<PathBuf> {
        if let Ok(base_path) = std::env::var("SHOPFIND_BASE_PATH") {
            return Ok(PathBuf::from(base_path));
        }

        let home = my_home()
            .context("Could not determine home directory")?
            .context("Home directory path is empty")?;
        Ok(home.join(".local/share/shopfind"))
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub base_path: PathBuf,
}
