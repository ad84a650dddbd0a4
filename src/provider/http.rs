use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    configuration::Config,
    error::Error,
    model::Provider,
    types::{BinanceTicker, CoinGeckoMarket, FixerRates},
};

/// Shared client for every provider request. The client-wide timeout bounds
/// each request; nothing here retries.
#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    pub http: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<Self, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HTTP { config, http })
    }

    /// `Ok(None)` when Binance does not list the pair.
    pub async fn get_binance_ticker(
        &self,
        symbol: &str,
    ) -> Result<Option<BinanceTicker>, Error> {
        let url = self.config.get_binance_ticker_url(symbol)?;
        let response = self.http.get(url).send().await?;

        if response.status() == StatusCode::BAD_REQUEST {
            info!(provider = %Provider::Binance, symbol, "symbol not listed, skipping");
            return Ok(None);
        }

        let ticker = read_json(Provider::Binance, response).await?;
        Ok(Some(ticker))
    }

    pub async fn get_coingecko_markets(
        &self,
        ids: &[String],
    ) -> Result<Vec<CoinGeckoMarket>, Error> {
        let url = self.config.get_coingecko_markets_url(ids)?;
        let response = self.http.get(url).send().await?;
        read_json(Provider::Coingecko, response).await
    }

    pub async fn get_fixer_rates(
        &self,
        codes: &[String],
    ) -> Result<FixerRates, Error> {
        let url = self.config.get_fixer_rates_url(codes)?;
        let response = self.http.get(url).send().await?;
        read_json(Provider::Fixer, response).await
    }
}

async fn read_json<T: DeserializeOwned>(
    provider: Provider,
    response: Response,
) -> Result<T, Error> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::ProviderStatus {
            provider,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::ProviderPayload {
        provider,
        reason: e.to_string(),
    })
}
