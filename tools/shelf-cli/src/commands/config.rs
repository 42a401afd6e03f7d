//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[storage]");
    ctx.output.kv("dir", &ctx.storage_dir().display().to_string());

    ctx.output.info("[cart]");
    ctx.output
        .kv("max_line_items", &ctx.config.cart.max_line_items.to_string());
    ctx.output.kv(
        "max_quantity_per_item",
        &ctx.config.cart.max_quantity_per_item.to_string(),
    );

    ctx.output.info("[notifications]");
    ctx.output
        .kv("ttl_secs", &ctx.config.notifications.ttl_secs.to_string());

    ctx.output.info("[checkout]");
    ctx.output.kv(
        "hosted_url",
        ctx.config.checkout.hosted_url.as_deref().unwrap_or("(unset)"),
    );

    ctx.output.info("[offline]");
    ctx.output.kv(
        "origin",
        ctx.config.offline.origin.as_deref().unwrap_or("(unset)"),
    );
    ctx.output.kv("cache_version", &ctx.config.offline.cache_version);

    if !ctx.config.currencies.is_empty() {
        ctx.output.info("[[currencies]]");
        for entry in &ctx.config.currencies {
            ctx.output.list_item(&format!("{} ({})", entry.code, entry.rate));
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shelf.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
