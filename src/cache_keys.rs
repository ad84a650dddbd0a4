//! Cache key constants and prefixes shared by the query controllers.

/// Fixed key of the all-prices response.
pub const PRICES: &str = "prices";

/// Prefix of filtered token responses, followed by the requested symbols.
pub const TOKENS: &str = "tokens";

/// Prefix of filtered fiat responses, followed by the requested symbols.
pub const FIATS: &str = "fiats";
