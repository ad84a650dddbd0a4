use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::{
    error::Error, helpers::fiat_symbol, model::Provider, types::Whitelist,
};

use super::{PriceObservation, PriceSource, HTTP};

/// Fiat rates source: one batched request against base USD.
pub struct Fixer {
    http: Arc<HTTP>,
}

impl Fixer {
    pub fn new(http: Arc<HTTP>) -> Self {
        Fixer { http }
    }
}

#[async_trait]
impl PriceSource for Fixer {
    fn provider(&self) -> Provider {
        Provider::Fixer
    }

    async fn fetch(
        &self,
        whitelist: &Whitelist,
    ) -> Result<Vec<PriceObservation>, Error> {
        if whitelist.fiat_codes.is_empty() {
            return Err(Error::NoTokensToFetch(Provider::Fixer));
        }

        let rates = self.http.get_fixer_rates(&whitelist.fiat_codes).await?;

        if !rates.success {
            info!(provider = %Provider::Fixer, "rates unavailable, skipping cycle");
            return Ok(vec![]);
        }

        let observed_at = Utc::now().timestamp_millis();
        let observations = whitelist
            .fiat_codes
            .iter()
            .filter_map(|code| {
                let price = *rates.rates.get(code)?;
                Some(PriceObservation {
                    symbol: fiat_symbol(code),
                    price,
                    observed_at,
                    supply: None,
                })
            })
            .collect();

        Ok(observations)
    }
}
