//! Consolidated database models
//!
//! Row structs organized by pipeline stage.

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// =============================================================================
// PROVIDERS
// =============================================================================

/// External quote providers polled by the subscription workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    Binance,
    Coingecko,
    Fixer,
}

impl Provider {
    /// Providers whose rows feed the canonical `tokens` table, in tie-break
    /// priority order.
    pub const TOKEN_SOURCES: [Provider; 2] =
        [Provider::Binance, Provider::Coingecko];

    /// Providers whose rows feed the canonical `fiats` table.
    pub const FIAT_SOURCES: [Provider; 1] = [Provider::Fixer];

    pub fn price_table(&self) -> &'static str {
        match self {
            Provider::Binance => r#"oracle."binance""#,
            Provider::Coingecko => r#"oracle."coingecko""#,
            Provider::Fixer => r#"oracle."fixer""#,
        }
    }

    pub fn supply_table(&self) -> Option<&'static str> {
        match self {
            Provider::Coingecko => Some(r#"oracle."coingeckosupply""#),
            Provider::Binance | Provider::Fixer => None,
        }
    }

    /// Lower wins when two fresh rows carry the same timestamp.
    pub fn priority(&self) -> u8 {
        match self {
            Provider::Binance => 0,
            Provider::Coingecko => 1,
            Provider::Fixer => 2,
        }
    }

    /// Whether per-symbol writes are spaced out to respect the provider's
    /// rate limits.
    pub fn paced(&self) -> bool {
        match self {
            Provider::Binance | Provider::Coingecko => true,
            Provider::Fixer => false,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Provider::Binance => write!(f, "binance"),
            Provider::Coingecko => write!(f, "coingecko"),
            Provider::Fixer => write!(f, "fixer"),
        }
    }
}

// =============================================================================
// PER-SOURCE TABLES
// =============================================================================

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Source_Price {
    pub symbol: String,
    pub price: f64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Source_Supply {
    pub symbol: String,
    pub supply: f64,
}

// =============================================================================
// CANONICAL TABLES
// =============================================================================

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Token_Price {
    pub symbol: String,
    pub price: f64,
    pub supply: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Deserialize, Serialize)]
pub struct Fiat_Price {
    pub symbol: String,
    pub price: f64,
}

// =============================================================================
// CHAIN REGISTRY
// =============================================================================

/// One denom entry of a registered chain.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Registry_Denom {
    pub ticker: Option<String>,
    pub price_id: Option<String>,
    pub fetch_price: bool,
}
