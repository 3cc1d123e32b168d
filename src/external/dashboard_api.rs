use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;
use crate::external::fetcher::AuthenticatedFetcher;
use crate::models::{DashboardConfig, DashboardPayload, UpdateStocksResponse};

pub const CONFIG_PATH: &str = "/api/config";
pub const UPDATE_STOCKS_PATH: &str = "/api/update-stocks";
pub const DATA_PATH: &str = "/api/get-data";

/// Typed endpoints of the dashboard backend. `Ok(None)` carries the fetcher's 401 outcome through.
#[derive(Clone)]
pub struct DashboardApi {
    fetcher: Arc<dyn AuthenticatedFetcher>,
}

fn decode<T: DeserializeOwned>(section: &str, value: Option<Value>) -> Result<Option<T>, AppError> {
    value
        .map(|v| serde_json::from_value(v).map_err(|e| AppError::malformed(section, e)))
        .transpose()
}

impl DashboardApi {
    pub fn new(fetcher: Arc<dyn AuthenticatedFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn get_config(&self) -> Result<Option<DashboardConfig>, AppError> {
        let value = self.fetcher.get_json(CONFIG_PATH).await?;
        decode("config", value)
    }

    pub async fn update_stocks(
        &self,
        config: &DashboardConfig,
    ) -> Result<Option<UpdateStocksResponse>, AppError> {
        let body = serde_json::to_value(config)?;
        let value = self.fetcher.post_json(UPDATE_STOCKS_PATH, &body).await?;
        decode("update-stocks", value)
    }

    pub async fn get_data(&self) -> Result<Option<DashboardPayload>, AppError> {
        self.fetcher
            .get_json(DATA_PATH)
            .await?
            .map(DashboardPayload::from_value)
            .transpose()
    }
}
