use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::{error::Error, model::Provider, types::Whitelist};

use super::{PriceObservation, PriceSource, HTTP};

/// Exchange ticker source: one request per whitelisted `TICKERUSDT` pair.
pub struct Binance {
    http: Arc<HTTP>,
}

impl Binance {
    pub fn new(http: Arc<HTTP>) -> Self {
        Binance { http }
    }
}

#[async_trait]
impl PriceSource for Binance {
    fn provider(&self) -> Provider {
        Provider::Binance
    }

    fn requests(&self, whitelist: &Whitelist) -> Result<Vec<Whitelist>, Error> {
        if whitelist.token_tickers.is_empty() {
            return Err(Error::NoTokensToFetch(Provider::Binance));
        }

        Ok(whitelist
            .token_tickers
            .iter()
            .map(|ticker| Whitelist {
                token_tickers: vec![ticker.clone()],
                ..Whitelist::default()
            })
            .collect())
    }

    async fn fetch(
        &self,
        whitelist: &Whitelist,
    ) -> Result<Vec<PriceObservation>, Error> {
        if whitelist.token_tickers.is_empty() {
            return Err(Error::NoTokensToFetch(Provider::Binance));
        }

        let mut observations = vec![];

        for symbol in whitelist.token_symbols() {
            let ticker = match self.http.get_binance_ticker(&symbol).await? {
                Some(ticker) => ticker,
                None => continue,
            };

            let price: f64 =
                ticker.price.parse().map_err(|_| Error::ProviderPayload {
                    provider: Provider::Binance,
                    reason: format!(
                        "price {:?} of {} is not a number",
                        ticker.price, symbol
                    ),
                })?;

            if price == 0.0 {
                debug!(symbol, "zero price, not trading yet");
                continue;
            }

            observations.push(PriceObservation {
                symbol,
                price,
                observed_at: Utc::now().timestamp_millis(),
                supply: None,
            });
        }

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use actix_web::{web, HttpResponse};
    use serde_json::json;

    use super::*;
    use crate::tests::common::fixtures::{
        fake_provider, test_config, whitelist,
    };

    async fn ticker(query: web::Query<HashMap<String, String>>) -> HttpResponse {
        match query.get("symbol").map(String::as_str) {
            Some("ATOMUSDT") => HttpResponse::Ok()
                .json(json!({"symbol": "ATOMUSDT", "price": "10.50000000"})),
            Some("OSMOUSDT") => HttpResponse::Ok()
                .json(json!({"symbol": "OSMOUSDT", "price": "0.00000000"})),
            Some("BADUSDT") => HttpResponse::Ok()
                .json(json!({"symbol": "BADUSDT", "price": "n/a"})),
            Some("DOWNUSDT") => {
                HttpResponse::ServiceUnavailable().body("maintenance")
            },
            _ => HttpResponse::BadRequest()
                .json(json!({"code": -1121, "msg": "Invalid symbol."})),
        }
    }

    async fn source() -> Binance {
        let base = fake_provider(|cfg: &mut web::ServiceConfig| {
            cfg.route("/api/v3/ticker/price", web::get().to(ticker));
        })
        .await;

        let mut config = test_config();
        config.binance_url = format!("{}/api/v3/ticker/price", base);
        Binance::new(Arc::new(HTTP::new(config).unwrap()))
    }

    #[actix_web::test]
    async fn test_skips_unlisted_and_zero_prices() {
        let binance = source().await;
        let observations = binance
            .fetch(&whitelist(&["ATOM", "LUNA", "OSMO"], &[], &[]))
            .await
            .unwrap();

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].symbol, "ATOMUSDT");
        assert_eq!(observations[0].price, 10.5);
        assert_eq!(observations[0].supply, None);
    }

    #[actix_web::test]
    async fn test_server_error_aborts_batch() {
        let binance = source().await;
        let result = binance
            .fetch(&whitelist(&["ATOM", "DOWN"], &[], &[]))
            .await;

        assert!(matches!(
            result,
            Err(Error::ProviderStatus { status: 503, .. })
        ));
    }

    #[actix_web::test]
    async fn test_unparsable_price_is_payload_error() {
        let binance = source().await;
        let result = binance.fetch(&whitelist(&["BAD"], &[], &[])).await;

        assert!(matches!(result, Err(Error::ProviderPayload { .. })));
    }

    #[actix_web::test]
    async fn test_empty_whitelist_has_nothing_to_fetch() {
        let binance = source().await;
        let result = binance.fetch(&Whitelist::default()).await;

        assert!(matches!(
            result,
            Err(Error::NoTokensToFetch(Provider::Binance))
        ));
        assert!(matches!(
            binance.requests(&Whitelist::default()),
            Err(Error::NoTokensToFetch(Provider::Binance))
        ));
    }

    #[actix_web::test]
    async fn test_one_request_per_ticker() {
        let binance = source().await;
        let requests = binance
            .requests(&whitelist(&["ATOM", "LUNA"], &["cosmos"], &["EUR"]))
            .unwrap();

        assert_eq!(
            requests,
            vec![whitelist(&["ATOM"], &[], &[]), whitelist(&["LUNA"], &[], &[])]
        );
    }
}
