use serde::{Deserialize, Serialize};

use crate::models::quote::QuoteSlot;

/// The two instrument codes the backend tracks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub stock1: String,
    #[serde(default)]
    pub stock2: String,
}

impl DashboardConfig {
    /// Inputs are trimmed and nothing else; the backend decides what is valid.
    pub fn from_input(stock1: &str, stock2: &str) -> Self {
        Self {
            stock1: stock1.trim().to_string(),
            stock2: stock2.trim().to_string(),
        }
    }

    pub fn code_for(&self, slot: QuoteSlot) -> &str {
        match slot {
            QuoteSlot::Stock1 => &self.stock1,
            QuoteSlot::Stock2 => &self.stock2,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStocksResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpdateStocksResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    pub fn error_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unexpected response from server".to_string())
    }
}
