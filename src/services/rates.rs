//! Client for the external currency-rate API.
//!
//! The API answers a JSON map keyed `"<CUR>BRL"`, each entry carrying the
//! quote as a string `bid` field. A failed fetch (or a currency the table
//! doesn't know) degrades to rate 1.0 so record creation never fails on it.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::models::Currency;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rate API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Snapshot of quotes against BRL, keyed by the API's "<CUR>BRL" form.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the API payload, skipping entries whose `bid` is missing or malformed.
    pub fn from_api_json(value: &Value) -> Self {
        let mut rates = HashMap::new();
        if let Some(map) = value.as_object() {
            for (key, entry) in map {
                let bid = entry
                    .get("bid")
                    .and_then(|b| b.as_str())
                    .and_then(|b| b.parse::<f64>().ok());
                if let Some(bid) = bid {
                    rates.insert(key.clone(), bid);
                }
            }
        }
        Self { rates }
    }

    /// Rate to convert one unit of `currency` into BRL. BRL is always 1.0,
    /// as is any currency the table has no quote for (passthrough).
    pub fn to_brl(&self, currency: Currency) -> f64 {
        if currency == Currency::BRL {
            return 1.0;
        }
        self.rates.get(&currency.rate_key()).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[derive(Clone)]
pub struct RateClient {
    http: reqwest::Client,
    url: String,
}

impl RateClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
        }
    }

    pub async fn fetch_latest(&self) -> Result<RateTable, RateError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(RateError::Status(response.status()));
        }
        let value: Value = response.json().await?;
        Ok(RateTable::from_api_json(&value))
    }

    /// Fetch the latest table, falling back to an empty one (rate = 1.0
    /// everywhere) when the API is unreachable.
    pub async fn fetch_or_default(&self) -> RateTable {
        match self.fetch_latest().await {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("Exchange-rate fetch failed, using BRL passthrough: {:?}", e);
                RateTable::empty()
            }
        }
    }
}
