use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find products matching a list of tags
    Search {
        /// Comma separated tags, e.g. "bluetooth kulaklik,kablosuz"
        #[clap(short, long, default_value = "")]
        tags: String,

        /// Maximum number of products to return
        #[clap(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Lowest accepted price
        #[clap(long)]
        min_price: Option<f64>,

        /// Highest accepted price
        #[clap(long)]
        max_price: Option<f64>,

        /// Only products of this category
        #[clap(short, long)]
        category: Option<String>,

        /// Score by exact tag overlap only
        #[clap(long, default_value = "false")]
        exact_only: bool,

        /// Include per-product scores in the output
        #[clap(long, default_value = "false")]
        scores: bool,
    },

    /// List the best rated products in stock
    List {
        #[clap(short, long, default_value = "20")]
        limit: usize,
    },

    /// List categories of products in stock
    Categories,

    /// Show catalog statistics
    Stats,

    /// Replace the catalog with the built-in demo products
    Seed {
        /// Overwrite a non-empty catalog
        #[clap(short, long, default_value = "false")]
        force: bool,
    },

    /// Manage saved product cards
    Card {
        #[command(subcommand)]
        action: CardAction,
    },

    /// Start shopfind as a service.
    Daemon {
        /// Address to listen on, overrides `daemon.listen`
        #[clap(long)]
        listen: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CardAction {
    /// Save a product card
    Add {
        /// Product name
        #[clap(short, long)]
        name: String,

        /// Product description
        #[clap(short, long, default_value = "")]
        description: String,

        /// English product name
        #[clap(long, default_value = "")]
        name_en: String,

        /// What the product looks like
        #[clap(long, default_value = "")]
        visual: String,

        /// Comma separated tags
        #[clap(short, long, default_value = "")]
        tags: String,

        /// Confidence between 0 and 1
        #[clap(long)]
        confidence: Option<f64>,

        #[clap(short, long)]
        category: Option<String>,
    },

    /// List saved cards, newest first
    List {
        #[clap(short, long, default_value = "10")]
        limit: usize,
    },

    /// Find saved cards by description
    Find {
        query: String,

        #[clap(short, long, default_value = "10")]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_limit_reaches_validation() {
        let args = Args::try_parse_from(["shopfind", "search", "-t", "derz", "-l", "-1"]).unwrap();

        match args.command {
            Command::Search { limit, tags, .. } => {
                assert_eq!(limit, Some(-1));
                assert_eq!(tags, "derz");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
