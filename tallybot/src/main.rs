#[macro_use]
extern crate tracing;

#[macro_use]
extern crate eyre;

mod commands;
mod core;
mod leaderboard;
mod util;

use std::sync::Arc;

use eyre::{Result, WrapErr};
use tokio::{runtime::Builder as RuntimeBuilder, signal};

use crate::core::{commands::slash::SlashCommands, event_loop, logging, BotConfig, Context};

fn main() {
    let runtime = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .thread_stack_size(4 * 1024 * 1024)
        .build()
        .expect("Could not build runtime");

    if let Err(err) = dotenvy::dotenv() {
        eprintln!("No .env file loaded: {err}");
    }

    let log_worker_guard = logging::init();

    if let Err(source) = runtime.block_on(async_main()) {
        error!(?source, "Critical error in main");

        // Flush the file logs before exiting
        drop(log_worker_guard);
        std::process::exit(1);
    }
}

async fn async_main() -> Result<()> {
    BotConfig::init().wrap_err("Failed to initialize config")?;

    let (ctx, mut shards) = Context::new().await.wrap_err("Failed to create context")?;
    let ctx = Arc::new(ctx);

    let slash_commands = SlashCommands::get().collect();
    info!("Setting {} slash commands...", slash_commands.len());

    if let Err(err) = ctx.set_commands(&slash_commands).await {
        warn!(?err, "Failed to set slash commands");
    }

    tokio::spawn(Arc::clone(&ctx.cooldowns).clean_loop());

    tokio::select! {
        _ = event_loop(Arc::clone(&ctx), &mut shards) => error!("Event loop ended"),
        res = signal::ctrl_c() => match res {
            Ok(_) => info!("Received Ctrl+C"),
            Err(err) => error!(?err, "Failed to await Ctrl+C"),
        },
        _ = sigterm() => info!("Received SIGTERM"),
    }

    ctx.shutdown(&mut shards).await;

    Ok(())
}

#[cfg(unix)]
async fn sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            error!(?err, "Failed to listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}
