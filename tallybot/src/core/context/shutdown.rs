use std::time::Duration;

use tokio::time::sleep;
use twilight_gateway::{CloseFrame, Shard};

use crate::core::Context;

impl Context {
    #[cold]
    pub async fn shutdown(&self, shards: &mut [Shard]) {
        // Closing the inboxes lets every session render its expired view
        let count = self.leaderboards.clear();
        info!("Expiring {count} active leaderboards");

        // Give the sessions a moment for their final edit
        if count > 0 {
            sleep(Duration::from_secs(1)).await;
        }

        self.psql.close().await;
        info!("Closed database pool");

        for shard in shards {
            let shard_id = shard.id().number();

            if let Err(err) = shard.close(CloseFrame::NORMAL).await {
                warn!(shard_id, ?err, "Failed to close shard");
            }
        }

        info!("Finished shutdown routine");
    }
}
