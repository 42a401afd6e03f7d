//! Checkout commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use chrono::Utc;
use dialoguer::Confirm;
use serde::{Deserialize, Serialize};
use shelf_commerce::cart::LineItem;
use shelf_commerce::checkout::{
    CheckoutBridge, CheckoutOutcome, CheckoutSnapshot, HostedCheckoutRedirect, PaymentHandoff,
};
use shelf_commerce::sync::CheckoutSummary;
use shelf_commerce::Money;

use super::{CheckoutArgs, CheckoutCommand};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    match args.command {
        None => start(args.yes, ctx),
        Some(CheckoutCommand::Complete { reference }) => complete(&reference, ctx),
        Some(CheckoutCommand::List) => list(ctx),
    }
}

fn start(yes: bool, ctx: &Context) -> Result<()> {
    let (mut storefront, tray) = ctx.open_storefront()?;
    let bridge = CheckoutBridge::new().with_gateway(HostedCheckoutRedirect::from_config(
        ctx.config.checkout.hosted_url.as_deref(),
    ));

    if !storefront.is_empty() {
        let summary = storefront.register_surface(CheckoutSummary::new());
        print_summary(&summary.borrow(), ctx);

        if !yes && !ctx.output.is_json() {
            let confirmed = Confirm::new()
                .with_prompt("Proceed to payment?")
                .default(true)
                .interact()?;

            if !confirmed {
                ctx.output.warn("Checkout cancelled");
                return Ok(());
            }
        }
    }

    let outcome = bridge.checkout(&storefront);
    ctx.flush_notifications(&tray);

    match &outcome {
        CheckoutOutcome::CartEmpty => {}
        CheckoutOutcome::HandedOff { snapshot, handoff } => {
            let record = CheckoutRecord::new(snapshot, handoff);
            let path = save_record(&record, ctx)?;
            ctx.output.debug(&format!("Saved checkout record: {}", path.display()));

            if !ctx.output.is_json() {
                ctx.output.success(&format!("Checkout {} started", record.reference));
                if let Some(url) = &record.redirect_url {
                    ctx.output.kv("Pay at", url);
                }
                ctx.output.info(&format!(
                    "Run `shelf checkout complete {}` once payment succeeds.",
                    record.reference
                ));
            }
        }
        CheckoutOutcome::Unavailable => {
            if ctx.output.is_json() {
                ctx.output.json(&outcome);
            }
            bail!("Checkout did not start");
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&outcome);
    }
    Ok(())
}

fn complete(reference: &str, ctx: &Context) -> Result<()> {
    let path = record_path(reference, ctx)?;
    let mut record = load_record(&path)?;
    if let Some(at) = &record.completed_at {
        bail!("Checkout {} was already completed at {}", reference, at);
    }

    let (mut storefront, tray) = ctx.open_storefront()?;
    let unchanged = record.items.is_empty() || storefront.items() == record.items.as_slice();
    if unchanged {
        storefront.complete_checkout();
    } else {
        ctx.output.warn(&format!(
            "Cart changed since checkout {} started; removing only the paid items",
            reference
        ));
        for line in &record.items {
            storefront.update_quantity(line.id, -i64::from(line.quantity));
        }
    }
    record.completed_at = Some(Utc::now().to_rfc3339());
    save_record(&record, ctx)?;
    ctx.flush_notifications(&tray);

    if ctx.output.is_json() {
        ctx.output.json(&record);
    } else if storefront.is_empty() {
        ctx.output.success(&format!(
            "Checkout {} completed ({}). Cart emptied.",
            reference, record.display_total
        ));
    } else {
        ctx.output.success(&format!(
            "Checkout {} completed ({}). {} item(s) remain in the cart.",
            reference,
            record.display_total,
            storefront.count()
        ));
    }
    Ok(())
}

fn list(ctx: &Context) -> Result<()> {
    let dir = ctx.checkouts_dir()?;
    let mut records = Vec::new();

    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            match load_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => ctx.output.debug(&format!("Skipping {}: {:#}", path.display(), e)),
            }
        }
    }

    // Newest first
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if ctx.output.is_json() {
        ctx.output.json(&records);
        return Ok(());
    }

    ctx.output.header("Checkouts");
    if records.is_empty() {
        ctx.output.info("No checkouts yet");
        return Ok(());
    }

    let widths = [22, 26, 14, 10];
    ctx.output
        .table_row(&["Reference", "Started", "Total", "Status"], &widths);
    for record in &records {
        let status = if record.completed_at.is_some() {
            "paid"
        } else {
            "pending"
        };
        ctx.output.table_row(
            &[
                &record.reference,
                &record.created_at,
                &record.display_total,
                status,
            ],
            &widths,
        );
    }
    Ok(())
}

fn print_summary(summary: &CheckoutSummary, ctx: &Context) {
    if ctx.output.is_json() {
        return;
    }

    ctx.output.header("Order summary");
    for (line, total) in &summary.lines {
        ctx.output.kv(line, total);
    }
    ctx.output.kv("Items", &summary.item_count.to_string());
    ctx.output.kv("Total", &format!("{} {}", summary.total, summary.currency_code));
}

/// A checkout handed to a payment gateway.
#[derive(Debug, Serialize, Deserialize)]
struct CheckoutRecord {
    reference: String,
    gateway: String,
    created_at: String,
    #[serde(default)]
    completed_at: Option<String>,
    redirect_url: Option<String>,
    currency: String,
    item_count: u64,
    total: Money,
    display_total: String,
    amount_minor: i64,
    /// Lines paid for. Empty in records written before lines were kept.
    #[serde(default)]
    items: Vec<LineItem>,
}

impl CheckoutRecord {
    fn new(snapshot: &CheckoutSnapshot, handoff: &PaymentHandoff) -> Self {
        Self {
            reference: snapshot.reference.to_string(),
            gateway: handoff.gateway.clone(),
            created_at: Utc::now().to_rfc3339(),
            completed_at: None,
            redirect_url: handoff.redirect_url.clone(),
            currency: snapshot.currency.code.clone(),
            item_count: snapshot.item_count,
            total: snapshot.total,
            display_total: snapshot.display_total.clone(),
            amount_minor: snapshot.amount_minor,
            items: snapshot.items.clone(),
        }
    }
}

fn record_path(reference: &str, ctx: &Context) -> Result<PathBuf> {
    let valid = reference.starts_with("chk_")
        && reference
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        bail!("Invalid checkout reference: {}", reference);
    }
    Ok(ctx.checkouts_dir()?.join(format!("{}.json", reference)))
}

fn load_record(path: &Path) -> Result<CheckoutRecord> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("No checkout record at {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse checkout record: {}", path.display()))
}

fn save_record(record: &CheckoutRecord, ctx: &Context) -> Result<PathBuf> {
    let path = record_path(&record.reference, ctx)?;
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShelfConfig;
    use crate::output::Output;
    use shelf_commerce::cart::ProductInput;

    fn context(name: &str, hosted_url: Option<&str>) -> Context {
        let root = std::env::temp_dir().join(format!(
            "shelf-cli-checkout-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();

        let mut config = ShelfConfig::default();
        config.checkout.hosted_url = hosted_url.map(str::to_string);
        Context {
            config,
            config_path: Some(root.join("shelf.toml")),
            output: Output::new(false, true),
            cwd: root,
        }
    }

    #[test]
    fn test_start_then_complete() {
        let ctx = context("flow", Some("https://pay.example.com/checkout"));
        {
            let (mut storefront, _) = ctx.open_storefront().unwrap();
            storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
        }

        start(true, &ctx).unwrap();
        let dir = ctx.checkouts_dir().unwrap();
        let entry = fs::read_dir(&dir).unwrap().next().unwrap().unwrap();
        let record = load_record(&entry.path()).unwrap();
        assert_eq!(record.amount_minor, 1200);
        assert!(record.completed_at.is_none());

        complete(&record.reference, &ctx).unwrap();
        let (storefront, _) = ctx.open_storefront().unwrap();
        assert!(storefront.is_empty());
        assert!(complete(&record.reference, &ctx).is_err());

        let _ = fs::remove_dir_all(&ctx.cwd);
    }

    #[test]
    fn test_complete_keeps_items_added_after_handoff() {
        let ctx = context("changed", Some("https://pay.example.com/checkout"));
        {
            let (mut storefront, _) = ctx.open_storefront().unwrap();
            storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
            storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
        }

        start(true, &ctx).unwrap();
        let dir = ctx.checkouts_dir().unwrap();
        let entry = fs::read_dir(&dir).unwrap().next().unwrap().unwrap();
        let record = load_record(&entry.path()).unwrap();
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].quantity, 2);

        {
            let (mut storefront, _) = ctx.open_storefront().unwrap();
            storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
            storefront.add_item(ProductInput::new(2_u64, "Tea", 4.0, ""));
        }

        complete(&record.reference, &ctx).unwrap();
        let (storefront, _) = ctx.open_storefront().unwrap();
        let left: Vec<(u64, u32)> = storefront
            .items()
            .iter()
            .map(|i| (i.id.get(), i.quantity))
            .collect();
        assert_eq!(left, vec![(1, 1), (2, 1)]);

        let _ = fs::remove_dir_all(&ctx.cwd);
    }

    #[test]
    fn test_unavailable_without_hosted_url() {
        let ctx = context("unavailable", None);
        {
            let (mut storefront, _) = ctx.open_storefront().unwrap();
            storefront.add_item(ProductInput::new(1_u64, "Mug", 12.0, ""));
        }

        assert!(start(true, &ctx).is_err());
        let (storefront, _) = ctx.open_storefront().unwrap();
        assert_eq!(storefront.count(), 1);

        let _ = fs::remove_dir_all(&ctx.cwd);
    }

    #[test]
    fn test_reference_is_validated() {
        let ctx = context("validate", None);
        assert!(record_path("../../etc/passwd", &ctx).is_err());
        assert!(record_path("chk_abc-DEF_123", &ctx).is_ok());
        let _ = fs::remove_dir_all(&ctx.cwd);
    }
}
