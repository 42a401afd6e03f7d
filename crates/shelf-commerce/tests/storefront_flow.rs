//! End-to-end storefront flows over durable file storage.

use std::path::PathBuf;
use std::rc::Rc;

use shelf_cache::{Cache, FileBackend};
use shelf_commerce::prelude::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "shelf-commerce-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn open(dir: &PathBuf) -> (Storefront, Rc<NotificationTray>) {
    let cache = Cache::new(FileBackend::open(dir).unwrap());
    let tray = Rc::new(NotificationTray::new());
    let storefront = Storefront::open(cache, &StorefrontSettings::default(), tray.clone());
    (storefront, tray)
}

#[test]
fn test_cart_and_currency_survive_restart() {
    let dir = scratch_dir("restart");
    {
        let (mut storefront, _) = open(&dir);
        storefront.add_item(ProductInput::new(5_u64, "Leather Wallet", 25.0, "/img/wallet.jpg"));
        storefront.add_item(ProductInput::new(5_u64, "Leather Wallet", 25.0, "/img/wallet.jpg"));
        storefront.add_item(ProductInput::new(5_u64, "Leather Wallet", 25.0, "/img/wallet.jpg"));
        storefront.update_quantity(ProductId::new(5), -1);
        storefront.set_currency("NGN");
    }

    let (storefront, _) = open(&dir);
    assert_eq!(storefront.count(), 2);
    assert_eq!(storefront.total(), Money::from_decimal(50.0));
    assert_eq!(storefront.current_currency().code, "NGN");
    assert_eq!(storefront.format_current(storefront.total()), "\u{20a6}77,500");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_every_surface_agrees_after_each_change() {
    let dir = scratch_dir("surfaces");
    let (mut storefront, tray) = open(&dir);

    let legacy = storefront.register_surface(HeaderBadge::new("legacy-header"));
    let header = storefront.register_surface(HeaderBadge::new("header"));
    let drawer = storefront.register_surface(CartDrawer::new());
    let summary = storefront.register_surface(CheckoutSummary::new());

    assert!(!legacy.borrow().visible);
    assert_eq!(drawer.borrow().empty_message.as_deref(), Some("Your cart is empty"));

    storefront.add_item(ProductInput::new(1_u64, "Canvas Tote", 20.0, ""));
    storefront.add_item(ProductInput::new(2_u64, "Enamel Pin", 4.0, ""));
    storefront.update_quantity(ProductId::new(2), 2);
    assert_eq!(tray.last().unwrap().message, "Enamel Pin added to cart");

    storefront.set_currency("EUR");

    assert_eq!(legacy.borrow().text, "4");
    assert_eq!(legacy.borrow().text, header.borrow().text);
    assert_eq!(drawer.borrow().total, "\u{20ac}29.44");
    assert_eq!(summary.borrow().total, drawer.borrow().total);
    assert_eq!(summary.borrow().currency_code, "EUR");
    assert_eq!(summary.borrow().item_count, 4);

    storefront.remove_item(ProductId::new(1));
    assert_eq!(header.borrow().text, "3");
    assert_eq!(drawer.borrow().rows.len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_checkout_hands_off_then_completes() {
    let dir = scratch_dir("checkout");
    let (mut storefront, tray) = open(&dir);
    let bridge = CheckoutBridge::new()
        .with_gateway(HostedCheckoutRedirect::new("https://pay.example.com/session").unwrap());

    assert_eq!(bridge.checkout(&storefront), CheckoutOutcome::CartEmpty);
    assert_eq!(tray.last().unwrap().message, "Your cart is empty");

    storefront.add_item(ProductInput::new(3_u64, "Wool Scarf", 40.0, ""));
    storefront.set_currency("KES");

    let outcome = bridge.checkout(&storefront);
    let CheckoutOutcome::HandedOff { snapshot, handoff } = outcome else {
        panic!("expected handoff, got {:?}", outcome);
    };
    assert_eq!(snapshot.display_total, "KSh 5,160");
    let redirect = handoff.redirect_url.unwrap();
    assert!(redirect.starts_with("https://pay.example.com/session?reference=chk_"));
    assert!(redirect.ends_with("&amount=5160&currency=KES"));
    assert_eq!(storefront.count(), 1);

    storefront.complete_checkout();
    let (reopened, _) = open(&dir);
    assert!(reopened.is_empty());
    assert_eq!(reopened.current_currency().code, "KES");

    let _ = std::fs::remove_dir_all(&dir);
}
