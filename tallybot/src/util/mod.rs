pub use self::ext::*;

pub mod interaction;

mod ext;
