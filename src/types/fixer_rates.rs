use std::collections::HashMap;

use serde::Deserialize;

/// Body of Fixer's `latest` endpoint. A rejected request still answers 200
/// with `success: false` and no `rates`.
#[derive(Debug, Deserialize)]
pub struct FixerRates {
    pub success: bool,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}
