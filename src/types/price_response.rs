use serde::{Deserialize, Serialize};

use crate::model::{Fiat_Price, Token_Price};

/// Envelope of every HTTP response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            status: 200,
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(status: u16, message: String) -> Self {
        ApiResponse {
            status,
            data: None,
            message: Some(message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllPriceResponse {
    pub tokens: Vec<Token_Price>,
    pub fiats: Vec<Fiat_Price>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectTokens {
    pub tokens: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectFiats {
    pub fiats: Option<Vec<String>>,
}
