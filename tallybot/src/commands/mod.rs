pub mod cooldowns;
pub mod currency;
pub mod help;
pub mod ping;
pub mod status;
