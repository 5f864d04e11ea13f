use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

use super::dto::{BarcodeProduct, OffResponse};
use super::LookupError;
use crate::config::FoodDbConfig;

/// Product database keyed by barcode.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// `Ok(None)` when the code is unknown.
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeProduct>, LookupError>;
}

/// OpenFoodFacts v0 product API.
pub struct OpenFoodFacts {
    http: Client,
    base_url: String,
}

impl OpenFoodFacts {
    pub fn new(cfg: &FoodDbConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(concat!("nutrilog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build OpenFoodFacts client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl ProductLookup for OpenFoodFacts {
    #[instrument(skip(self))]
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeProduct>, LookupError> {
        let url = format!("{}/api/v0/product/{barcode}.json", self.base_url);
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = res.json::<OffResponse>().await?;
        let product = BarcodeProduct::from_response(barcode, body);
        debug!(found = product.is_some(), "product lookup done");
        Ok(product)
    }
}
