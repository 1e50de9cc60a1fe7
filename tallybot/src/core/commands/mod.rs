pub mod checks;
pub mod flags;
pub mod prefix;
pub mod slash;
