pub mod fiats;
pub mod prices;
pub mod tokens;
