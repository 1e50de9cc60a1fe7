pub use self::configs::CURRENCY_MAX_LEN;

mod configs;
