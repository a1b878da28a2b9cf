use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::models::{MonthlyKpi, SaleRecord};

/// Client for the pre-aggregated report endpoints. The endpoints return
/// JSON arrays whose keys match the row struct fields exactly, so the
/// rows deserialize with no renaming.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    detailed_url: String,
    kpi_url: String,
}

impl ApiClient {
    pub fn new(detailed_url: String, kpi_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            detailed_url,
            kpi_url,
        }
    }

    pub async fn fetch_detailed(&self) -> anyhow::Result<Vec<SaleRecord>> {
        self.get_json(&self.detailed_url)
            .await
            .context("detailed sales endpoint failed")
    }

    pub async fn fetch_monthly_kpis(&self) -> anyhow::Result<Vec<MonthlyKpi>> {
        self.get_json(&self.kpi_url)
            .await
            .context("monthly KPI endpoint failed")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
