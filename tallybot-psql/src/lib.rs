#[macro_use]
extern crate eyre;

#[macro_use]
extern crate tracing;

pub use self::{database::Database, impls::CURRENCY_MAX_LEN};

mod database;
mod impls;

pub mod model;

#[cfg(test)]
pub mod tests {
    use eyre::{Result, WrapErr};
    use twilight_model::id::Id;

    use super::database::Database;

    pub fn database() -> Result<Database> {
        let _ = dotenvy::dotenv();
        let uri = std::env::var("DATABASE_URL").wrap_err("missing `DATABASE_URL`")?;

        Database::new(&uri)
    }

    pub fn discord_id<M>() -> Id<M> {
        Id::new(u64::MAX >> 1)
    }
}
