//! Currency commands.

use anyhow::{bail, Result};
use serde::Serialize;
use shelf_commerce::Money;

use super::{CurrencyArgs, CurrencyCommand};
use crate::context::Context;

/// Run the currency command.
pub fn run(args: CurrencyArgs, ctx: &Context) -> Result<()> {
    let (mut storefront, tray) = ctx.open_storefront()?;

    match args.command {
        CurrencyCommand::List => {
            let selected = storefront.current_currency().code;
            let table = storefront.selection().table();

            if ctx.output.is_json() {
                let rows: Vec<CurrencyRow> = table
                    .iter()
                    .map(|entry| CurrencyRow {
                        code: &entry.code,
                        display_name: &entry.display_name,
                        rate: entry.rate,
                        example: storefront.format(Money::from_decimal(100.0), &entry.code),
                        selected: entry.code == selected,
                    })
                    .collect();
                ctx.output.json(&rows);
                return Ok(());
            }

            ctx.output.header("Currencies");
            let widths = [2, 5, 26, 10, 14];
            ctx.output
                .table_row(&["", "Code", "Name", "Rate", "$100.00"], &widths);
            for entry in table.iter() {
                let marker = if entry.code == selected { "*" } else { "" };
                ctx.output.table_row(
                    &[
                        marker,
                        &entry.code,
                        &entry.display_name,
                        &entry.rate.to_string(),
                        &storefront.format(Money::from_decimal(100.0), &entry.code),
                    ],
                    &widths,
                );
            }
        }
        CurrencyCommand::Set { code } => {
            if !storefront.set_currency(&code) {
                bail!(
                    "Unknown currency: {}. Run `shelf currency list` to see available codes.",
                    code
                );
            }
            let current = storefront.current_currency();
            ctx.output.success(&format!(
                "Prices now shown in {} ({})",
                current.display_name, current.code
            ));
            show(&storefront, ctx);
        }
        CurrencyCommand::Show => show(&storefront, ctx),
    }

    ctx.flush_notifications(&tray);
    Ok(())
}

#[derive(Serialize)]
struct CurrencyRow<'a> {
    code: &'a str,
    display_name: &'a str,
    rate: f64,
    example: String,
    selected: bool,
}

fn show(storefront: &shelf_commerce::Storefront, ctx: &Context) {
    let current = storefront.current_currency();
    if ctx.output.is_json() {
        ctx.output.json(&current);
        return;
    }

    ctx.output.kv("Code", &current.code);
    ctx.output.kv("Name", &current.display_name);
    ctx.output.kv("Symbol", current.symbol.trim_end());
    ctx.output.kv("Rate", &current.rate.to_string());
    ctx.output
        .kv("Cart total", &storefront.format_current(storefront.total()));
}
