use sqlx::PgPool;

use crate::api::ApiClient;
use crate::db;
use crate::models::{MonthlyKpi, SaleRecord};
use crate::window;

/// The two interchangeable data-acquisition variants. Everything
/// downstream of the fetch works on the same row types regardless of
/// which variant produced them.
pub enum Source {
    Db(PgPool),
    Api(ApiClient),
}

impl Source {
    pub async fn fetch_detailed(&self) -> anyhow::Result<Vec<SaleRecord>> {
        match self {
            Source::Db(pool) => db::fetch_detailed(pool, window::window_start()).await,
            Source::Api(client) => client.fetch_detailed().await,
        }
    }

    pub async fn fetch_monthly_kpis(&self) -> anyhow::Result<Vec<MonthlyKpi>> {
        match self {
            Source::Db(pool) => db::fetch_monthly_kpis(pool, window::window_start()).await,
            Source::Api(client) => client.fetch_monthly_kpis().await,
        }
    }
}
