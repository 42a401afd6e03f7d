//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod currency;
pub mod offline;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add one unit of a product.
    Add {
        /// Product id.
        id: u64,
        /// Product name.
        #[arg(short, long)]
        name: String,
        /// Unit price in the base currency.
        #[arg(short, long)]
        price: f64,
        /// Product image URL.
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// Remove a product's line.
    Remove {
        /// Product id.
        id: u64,
    },
    /// Change a line's quantity by a delta.
    Qty {
        /// Product id.
        id: u64,
        /// Quantity change; zero or below removes the line.
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Show the cart.
    Show,
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the currency command.
#[derive(Args)]
pub struct CurrencyArgs {
    #[command(subcommand)]
    pub command: CurrencyCommand,
}

#[derive(Subcommand)]
pub enum CurrencyCommand {
    /// List available currencies.
    List,
    /// Select the display currency.
    Set {
        /// Currency code.
        code: String,
    },
    /// Show the selected currency.
    Show,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: Option<CheckoutCommand>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Mark a handed-off checkout as paid and empty the cart.
    Complete {
        /// Checkout reference (chk_...).
        reference: String,
    },
    /// List checkout records.
    List,
}

/// Arguments for the offline command.
#[derive(Args)]
pub struct OfflineArgs {
    #[command(subcommand)]
    pub command: OfflineCommand,
}

#[derive(Subcommand)]
pub enum OfflineCommand {
    /// Show the offline policy.
    Show,
    /// Show which strategy serves a request.
    Strategy {
        /// Request URL or same-origin path.
        url: String,
        /// HTTP method.
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
