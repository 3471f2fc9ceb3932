/*
 * Buff163 Price Bot
 * SPDX-License-Identifier: AGPL-3.0-or-later
 */

use std::sync::Arc;

use anyhow::{ Context, Result };
use clap::Parser;

use buff_price_bot::config::{ Cli, Settings };
use buff_price_bot::core::logger::{
    init_from_args,
    log_init_failed,
    log_init_ok_with_details,
    log_init_start,
};
use buff_price_bot::server::run_async_server;
use buff_price_bot::{ PricePlugin, default_registry, log_info };

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_from_args(args.debug, args.journald).context("Failed to initialize logger")?;

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    settings.apply_cli(&args);

    // One-shot mode: answer a single query on stdout
    if let Some(item_name) = &args.query {
        let plugin = PricePlugin::new(&settings);
        for message in plugin.search_price_replies(item_name).await {
            println!("{}", message);
        }
        return Ok(());
    }

    log_init_start("chat gateway");
    let registry = Arc::new(default_registry(&settings)?);
    log_init_ok_with_details(
        "chat gateway",
        &format!("{} plugin(s), listening on {}", registry.len(), settings.server.listen_addr())
    );

    tokio::select! {
        result = run_async_server(&settings.server, registry) => {
            if let Err(e) = &result {
                log_init_failed("chat gateway", &e.to_string());
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            log_info!("Shutting down chat gateway");
            Ok(())
        }
    }
}
