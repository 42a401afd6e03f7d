//! Offline policy commands.

use anyhow::{bail, Context as _, Result};
use http::{Method, Uri};
use serde::Serialize;
use shelf_offline::FetchStrategy;

use super::{OfflineArgs, OfflineCommand};
use crate::context::Context;

/// Run the offline command.
pub fn run(args: OfflineArgs, ctx: &Context) -> Result<()> {
    let Some(policy) = ctx.config.offline_policy()? else {
        bail!("No offline origin configured. Set [offline] origin in shelf.toml.");
    };

    match args.command {
        OfflineCommand::Show => {
            if ctx.output.is_json() {
                ctx.output.json(&policy);
                return Ok(());
            }

            ctx.output.header("Offline policy");
            ctx.output.kv("origin", &policy.origin);
            ctx.output.kv(
                "backend_host",
                policy.backend_host.as_deref().unwrap_or("(none)"),
            );
            ctx.output.kv("cache", &policy.cache_name());
            ctx.output.info("Core assets (cache-first):");
            for asset in &policy.core_assets {
                ctx.output.list_item(asset);
            }
        }
        OfflineCommand::Strategy { url, method } => {
            let method: Method = method
                .to_uppercase()
                .parse()
                .with_context(|| format!("Invalid method: {}", method))?;
            let uri: Uri = url
                .parse()
                .with_context(|| format!("Invalid URL: {}", url))?;
            let strategy = policy.strategy_for(&method, &uri);

            if ctx.output.is_json() {
                ctx.output.json(&StrategyReport {
                    method: method.as_str(),
                    url: &url,
                    strategy,
                });
            } else {
                println!("{}", strategy);
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct StrategyReport<'a> {
    method: &'a str,
    url: &'a str,
    strategy: FetchStrategy,
}
