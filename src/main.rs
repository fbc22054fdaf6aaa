use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fundscope::core::QueryParams;
use fundscope::core::log::init_logging;
use fundscope::core::query::FundQuery;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct QueryArgs {
    /// ISIN to match exactly (case-insensitive)
    #[arg(short, long)]
    search: Option<String>,
    /// Comma-separated category prefixes
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    currency: Option<String>,
    /// Comma-separated risk bands, e.g. "Low,Very-High"
    #[arg(long)]
    risk_levels: Option<String>,
    /// ytd_return, one_year_return, three_year_return, morningstar_rating or management_fee
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(short, long)]
    page: Option<String>,
    #[arg(short, long)]
    limit: Option<String>,
    /// Dataset to query instead of the configured one
    #[arg(short, long)]
    data: Option<PathBuf>,
}

impl From<QueryArgs> for fundscope::AppCommand {
    fn from(args: QueryArgs) -> fundscope::AppCommand {
        let params = QueryParams {
            page: args.page,
            limit: args.limit,
            search: args.search,
            category: args.category,
            currency: args.currency,
            sort_by: args.sort_by,
            risk_levels: args.risk_levels,
        };
        fundscope::AppCommand::Query {
            query: FundQuery::from_params(&params),
            data_path: args.data,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the fund catalog API
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:8080
        #[arg(short, long)]
        bind: Option<String>,
        /// Dataset to serve instead of the configured one
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Query the catalog and print one page
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let quiet_level = match cli.command {
        Some(Commands::Serve { .. }) => LevelFilter::INFO,
        _ => LevelFilter::OFF,
    };
    init_logging(cli.verbose, quiet_level);

    let result = match cli.command {
        Some(Commands::Setup) => fundscope::cli::setup::setup(),
        Some(Commands::Serve { bind, data }) => {
            fundscope::run_command(
                fundscope::AppCommand::Serve {
                    bind,
                    data_path: data,
                },
                cli.config_path.as_deref(),
            )
            .await
        }
        Some(Commands::Query(args)) => {
            fundscope::run_command(args.into(), cli.config_path.as_deref()).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
