use async_trait::async_trait;

use crate::{error::Error, model::Provider, types::Whitelist};

/// One quote as reported by a provider, already mapped to our symbol
/// convention. `observed_at` is a unix timestamp in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    pub symbol: String,
    pub price: f64,
    pub observed_at: i64,
    pub supply: Option<f64>,
}

/// A polled quote provider. Implementations issue at most the requests one
/// cycle needs and never retry.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn provider(&self) -> Provider;

    /// Splits a cycle's whitelist into the parts fetched by one request
    /// each. Batched providers take the whole whitelist at once.
    fn requests(&self, whitelist: &Whitelist) -> Result<Vec<Whitelist>, Error> {
        Ok(vec![whitelist.clone()])
    }

    async fn fetch(
        &self,
        whitelist: &Whitelist,
    ) -> Result<Vec<PriceObservation>, Error>;
}
