use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::Error, helpers::token_symbol, model::Provider, types::Whitelist,
};

use super::{PriceObservation, PriceSource, HTTP};

/// Market aggregator source: one batched request over all price ids, with
/// circulating supply.
pub struct Coingecko {
    http: Arc<HTTP>,
}

impl Coingecko {
    pub fn new(http: Arc<HTTP>) -> Self {
        Coingecko { http }
    }
}

#[async_trait]
impl PriceSource for Coingecko {
    fn provider(&self) -> Provider {
        Provider::Coingecko
    }

    async fn fetch(
        &self,
        whitelist: &Whitelist,
    ) -> Result<Vec<PriceObservation>, Error> {
        if whitelist.price_ids.is_empty() {
            return Err(Error::NoTokensToFetch(Provider::Coingecko));
        }

        let markets = self
            .http
            .get_coingecko_markets(&whitelist.price_ids)
            .await?;
        let observed_at = Utc::now().timestamp_millis();

        let observations = markets
            .into_iter()
            .filter(|market| whitelist.price_ids.contains(&market.id))
            .filter_map(|market| {
                Some(PriceObservation {
                    symbol: token_symbol(&market.symbol),
                    price: market.current_price?,
                    observed_at,
                    supply: market.circulating_supply,
                })
            })
            .collect();

        Ok(observations)
    }
}
