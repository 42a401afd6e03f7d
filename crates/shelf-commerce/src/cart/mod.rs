//! Shopping cart module.
//!
//! Contains the line item list, its durable store, and the engine that
//! mutates it.

mod cart;
mod engine;
mod store;

pub use cart::{AddOutcome, Cart, LineItem, ProductInput};
pub use engine::CartEngine;
pub use store::{CartStore, CART_KEY};
