//! Command line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sweetshop_core::models::{NewSweet, Pagination, SweetSearch, SweetUpdate};

#[derive(Parser, Debug)]
#[command(name = "sweetshop", version, about = "Browse and buy from the sweet shop")]
pub struct Cli {
    /// Base URL of the shop API (overrides the config file)
    #[arg(long, env = "SWEETSHOP_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        /// Account email (defaults to the last one used)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        email: String,
        /// Full name shown on the account
        #[arg(long)]
        name: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is active
    Status,
    /// Catalog commands
    #[command(subcommand)]
    Sweets(SweetsCommand),
    /// List your purchases
    Purchases,
}

#[derive(Subcommand, Debug)]
pub enum SweetsCommand {
    /// List the catalog
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one sweet
    Get { id: i64 },
    /// Search by name, category and price range
    Search(SearchArgs),
    /// Add a sweet (admin)
    Create(CreateArgs),
    /// Change fields of a sweet (admin)
    Update {
        id: i64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Remove a sweet (admin)
    Delete { id: i64 },
    /// Buy a sweet
    Purchase {
        id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: i32,
    },
    /// Add stock (admin)
    Restock {
        id: i64,
        #[arg(long)]
        quantity: i32,
    },
}

impl SweetsCommand {
    pub fn pagination(skip: Option<u32>, limit: Option<u32>) -> Option<Pagination> {
        if skip.is_none() && limit.is_none() {
            None
        } else {
            Some(Pagination { skip, limit })
        }
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to match in the name
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
}

impl From<SearchArgs> for SweetSearch {
    fn from(args: SearchArgs) -> Self {
        SweetSearch {
            query: args.query,
            category: args.category,
            min_price: args.min_price,
            max_price: args.max_price,
        }
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub price: f64,
    #[arg(long)]
    pub quantity: i32,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<CreateArgs> for NewSweet {
    fn from(args: CreateArgs) -> Self {
        NewSweet {
            name: args.name,
            description: args.description,
            category: args.category,
            price: args.price,
            quantity: args.quantity,
            image_url: args.image_url,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub quantity: Option<i32>,
    #[arg(long)]
    pub image_url: Option<String>,
}

impl From<UpdateArgs> for SweetUpdate {
    fn from(args: UpdateArgs) -> Self {
        SweetUpdate {
            name: args.name,
            description: args.description,
            category: args.category,
            price: args.price,
            quantity: args.quantity,
            image_url: args.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "sweetshop", "sweets", "search", "--category", "Chocolate", "--max-price", "3",
        ])
        .unwrap();
        match cli.command {
            Command::Sweets(SweetsCommand::Search(args)) => {
                let search = SweetSearch::from(args);
                assert_eq!(search.category.as_deref(), Some("Chocolate"));
                assert_eq!(search.max_price, Some(3.0));
                assert_eq!(search.query, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_only_sets_given_fields() {
        let cli = Cli::try_parse_from(["sweetshop", "sweets", "update", "4", "--price", "1.75"])
            .unwrap();
        match cli.command {
            Command::Sweets(SweetsCommand::Update { id, fields }) => {
                assert_eq!(id, 4);
                let update = SweetUpdate::from(fields);
                assert_eq!(update.price, Some(1.75));
                assert_eq!(update.name, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_purchase_quantity_defaults_to_one() {
        let cli = Cli::try_parse_from(["sweetshop", "sweets", "purchase", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Sweets(SweetsCommand::Purchase { id: 7, quantity: 1 })
        ));
    }

    #[test]
    fn test_pagination_only_when_flags_given() {
        assert_eq!(SweetsCommand::pagination(None, None), None);
        assert_eq!(
            SweetsCommand::pagination(None, Some(5)),
            Some(Pagination {
                skip: None,
                limit: Some(5)
            })
        );
    }
}
