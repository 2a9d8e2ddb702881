use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "inventory-console",
    version,
    about = "form-to-fetch console for a product inventory API",
    long_about = "inventory-console fills the inventory page's forms from the command line, sends the matching request to the product API and prints the highlighted JSON response.\n\nExamples:\n  inventory-console view-all\n  inventory-console category Electronics\n  inventory-console price 10 99.5\n  inventory-console add --name Widget --category Tools --quantity 5 --stock 10 --price 9.99\n  inventory-console --api http://inventory.local/api/products search lamp\n\nTip: Use --config (or `inventory-console init-config`) to persist the API address."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        long = "raw",
        global = true,
        help_heading = "Output",
        help = "Print the output-region markup as is."
    )]
    pub raw: bool,

    #[arg(
        short = 'a',
        long = "api",
        visible_alias = "api-base-url",
        value_name = "URL",
        global = true,
        help_heading = "API",
        help = "Product endpoint of the inventory API (default http://localhost:8090/api/products)."
    )]
    pub api: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.inventory-console/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Give up on a request after this many seconds (default: wait forever)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        global = true,
        help_heading = "HTTP",
        help = "Send requests through this proxy."
    )]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per form (or button) on the inventory page.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every product.
    ViewAll,
    /// Search products whose name contains a keyword.
    Search {
        #[arg(value_name = "KEYWORD", allow_hyphen_values = true)]
        keyword: String,
    },
    /// List products of a category.
    Category {
        #[arg(value_name = "CATEGORY", allow_hyphen_values = true)]
        category: String,
    },
    /// List products whose stock is at or below a level.
    Stock {
        #[arg(value_name = "LEVEL", allow_hyphen_values = true)]
        stock: String,
    },
    /// List products priced within a range.
    Price {
        #[arg(value_name = "MIN", allow_hyphen_values = true)]
        min_price: String,
        #[arg(value_name = "MAX", allow_hyphen_values = true)]
        max_price: String,
    },
    /// Create a product.
    Add(ProductFields),
    /// Look up a product by its exact name.
    FindName {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },
    /// Replace a product's fields.
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product.
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Write the default config file if it does not exist yet.
    InitConfig,
}

#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    #[arg(long, value_name = "NAME")]
    pub name: String,

    #[arg(long, value_name = "CATEGORY")]
    pub category: String,

    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub quantity: String,

    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub stock: String,

    #[arg(long, value_name = "PRICE", allow_hyphen_values = true)]
    pub price: String,
}
