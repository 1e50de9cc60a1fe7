use std::future::IntoFuture;

use eyre::{Result, WrapErr};
use twilight_http::{error::Error as HttpError, Response};
use twilight_model::application::command::Command;

use crate::core::{BotConfig, Context};

impl Context {
    /// Send a request through the given bucket.
    ///
    /// Ratelimit information of the response is forwarded to the bucket so
    /// that the next request in line waits accordingly.
    pub async fn send<R, T>(&self, bucket: &str, request: R) -> Result<Response<T>, HttpError>
    where
        R: IntoFuture<Output = Result<Response<T>, HttpError>>,
    {
        let notifier = self.buckets.notifier();

        let task = || async move {
            let res = request.await;

            match res {
                Ok(ref response) => notifier.inspect_headers(bucket, response.headers()),
                Err(ref err) => notifier.inspect_error(bucket, err),
            }

            res
        };

        self.buckets.execute(bucket, task).await
    }

    /// Register the slash commands, either in the dev guild or globally.
    pub async fn set_commands(&self, commands: &[Command]) -> Result<()> {
        let client = self.interaction();

        match BotConfig::get().dev_guild {
            Some(guild) => {
                client
                    .set_guild_commands(guild, commands)
                    .await
                    .wrap_err("Failed to set guild commands")?;

                info!(guild = guild.get(), "Registered slash commands in dev guild");
            }
            None => {
                client
                    .set_global_commands(commands)
                    .await
                    .wrap_err("Failed to set global commands")?;

                info!("Registered global slash commands");
            }
        }

        Ok(())
    }
}
