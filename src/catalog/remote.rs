use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CatalogError, CatalogFilter, CatalogReader, Product};

pub const CANDIDATES_ROUTE: &str = "/api/catalog/candidates";

/// Catalog served by another shopfind daemon.
pub struct RemoteCatalog {
    remote_addr: String,
    timeout: Duration,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
enum WebResponse<T> {
    Error { error: String },
    Data(T),
}

impl RemoteCatalog {
    pub fn new(addr: &str, timeout: Duration) -> RemoteCatalog {
        let remote_addr = addr.strip_suffix('/').unwrap_or(addr).to_string();

        RemoteCatalog {
            remote_addr,
            timeout,
        }
    }
}

impl CatalogReader for RemoteCatalog {
    fn fetch_candidates(&self, filter: &CatalogFilter) -> Result<Vec<Product>, CatalogError> {
        let url = format!("{}{CANDIDATES_ROUTE}", self.remote_addr);
        log::debug!("POST {url}");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let text = client.post(&url).json(filter).send()?.text()?;

        let rows = match serde_json::from_str::<WebResponse<Vec<serde_json::Value>>>(&text) {
            Ok(WebResponse::Data(rows)) => rows,
            Ok(WebResponse::Error { error }) => return Err(CatalogError::RemoteResponse(error)),
            Err(err) => {
                log::error!("{err}. tried to parse: {text:?}");
                return Err(err.into());
            }
        };

        Ok(decode_rows(rows, filter))
    }
}

/// Decodes each row on its own; a malformed row is dropped without
/// affecting the others. The filter is re-applied since the payload comes
/// from outside.
fn decode_rows(rows: Vec<serde_json::Value>, filter: &CatalogFilter) -> Vec<Product> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let decoded = serde_json::from_value::<Product>(row)
                .map_err(CatalogError::from)
                .and_then(Product::validated);
            match decoded {
                Ok(product) => Some(product),
                Err(err) => {
                    log::warn!("remote catalog: skipping row {idx}: {err}");
                    None
                }
            }
        })
        .filter(|product| filter.matches(product))
        .collect()
}
