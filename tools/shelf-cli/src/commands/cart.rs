//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use shelf_commerce::cart::ProductInput;
use shelf_commerce::sync::CartDrawer;
use shelf_commerce::{ProductId, Storefront};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let (mut storefront, tray) = ctx.open_storefront()?;

    match args.command {
        CartCommand::Add {
            id,
            name,
            price,
            image,
        } => {
            if !price.is_finite() || price < 0.0 {
                bail!("Price must be a non-negative number");
            }
            storefront.add_item(ProductInput::new(id, name, price, image));
        }
        CartCommand::Remove { id } => {
            if !storefront.remove_item(ProductId::new(id)) {
                ctx.output.warn(&format!("Product {} is not in the cart", id));
            }
        }
        CartCommand::Qty { id, delta } => {
            if let Some(warning) = update_quantity(&mut storefront, ProductId::new(id), delta) {
                ctx.output.warn(&warning);
            }
        }
        CartCommand::Show => {}
        CartCommand::Clear { yes } => {
            if storefront.is_empty() {
                ctx.output.info("Cart is already empty");
            } else if yes || confirm_clear(&storefront)? {
                storefront.clear_cart();
                ctx.output.success("Cart cleared");
            } else {
                ctx.output.warn("Cancelled");
            }
        }
    }

    ctx.flush_notifications(&tray);
    print_cart(&mut storefront, ctx);
    Ok(())
}

/// Apply a quantity change. Returns a warning only when the product is absent;
/// the cap is reported through the notification tray.
fn update_quantity(storefront: &mut Storefront, id: ProductId, delta: i64) -> Option<String> {
    if storefront.get(id).is_none() {
        return Some(format!("Product {} is not in the cart", id));
    }
    storefront.update_quantity(id, delta);
    None
}

fn confirm_clear(storefront: &Storefront) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Remove all {} item(s) from the cart?", storefront.count()))
        .default(false)
        .interact()?)
}

/// Render the cart through a drawer surface.
pub fn print_cart(storefront: &mut Storefront, ctx: &Context) {
    let drawer = storefront.register_surface(CartDrawer::new());
    let drawer = drawer.borrow();

    if ctx.output.is_json() {
        ctx.output.json(&*drawer);
        return;
    }

    ctx.output.header("Cart");
    if let Some(message) = &drawer.empty_message {
        ctx.output.info(message);
        return;
    }

    let widths = [6, 28, 5, 12, 12];
    ctx.output
        .table_row(&["ID", "Product", "Qty", "Price", "Total"], &widths);
    for row in &drawer.rows {
        ctx.output.table_row(
            &[
                &row.id.to_string(),
                &row.name,
                &row.quantity.to_string(),
                &row.unit_price,
                &row.line_total,
            ],
            &widths,
        );
    }
    ctx.output.kv("Items", &storefront.count().to_string());
    ctx.output.kv("Subtotal", &drawer.subtotal);
    ctx.output.kv("Total", &drawer.total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_cache::Cache;
    use shelf_commerce::notify::{NotificationTray, Severity};
    use shelf_commerce::settings::StorefrontSettings;
    use std::rc::Rc;

    fn storefront(max_quantity_per_item: u32) -> (Storefront, Rc<NotificationTray>) {
        let tray = Rc::new(NotificationTray::new());
        let settings = StorefrontSettings {
            max_quantity_per_item,
            ..StorefrontSettings::default()
        };
        let mut storefront = Storefront::open(Cache::in_memory(), &settings, tray.clone());
        storefront.add_item(ProductInput::new(1_u64, "Mug", 1.0, ""));
        tray.drain();
        (storefront, tray)
    }

    #[test]
    fn test_qty_zero_on_present_product_is_silent() {
        let (mut storefront, tray) = storefront(99);
        assert!(update_quantity(&mut storefront, ProductId::new(1), 0).is_none());
        assert!(tray.last().is_none());
        assert_eq!(storefront.count(), 1);
    }

    #[test]
    fn test_qty_at_cap_reports_maximum() {
        let (mut storefront, tray) = storefront(2);
        assert!(update_quantity(&mut storefront, ProductId::new(1), 1).is_none());
        assert!(update_quantity(&mut storefront, ProductId::new(1), 1).is_none());

        let last = tray.last().unwrap();
        assert_eq!(last.severity, Severity::Info);
        assert_eq!(last.message, "Mug is already at the maximum quantity");
        assert_eq!(storefront.count(), 2);
    }

    #[test]
    fn test_qty_on_absent_product_warns() {
        let (mut storefront, _) = storefront(99);
        assert_eq!(
            update_quantity(&mut storefront, ProductId::new(9), 1).as_deref(),
            Some("Product 9 is not in the cart")
        );
    }
}
