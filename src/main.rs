use anyhow::Result;
use brokerscope::cli::context::PeriodRequest;
use brokerscope::core::log::init_logging;
use brokerscope::core::views::top_traders::RankMode;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Broker daily CSV, overrides the configured data path
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(flatten)]
    period: PeriodArgs,

    /// Use the dataset as-is, without filling missing business days
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PeriodArgs {
    /// Period preset: "Last closed week", "Last 4 weeks", "Last 3 months",
    /// "Last 12 months" (or 1w, 4w, 3m, 12m)
    #[arg(short, long, global = true, conflicts_with_all = ["from", "to"])]
    preset: Option<String>,

    /// Start of a custom period (YYYY-MM-DD)
    #[arg(long, global = true, requires = "to")]
    from: Option<NaiveDate>,

    /// End of a custom period (YYYY-MM-DD)
    #[arg(long, global = true, requires = "from")]
    to: Option<NaiveDate>,

    /// Anchor presets on the last closed calendar week instead of the newest
    /// date in the dataset
    #[arg(long, global = true, conflicts_with_all = ["from", "to"])]
    calendar: bool,

    /// Reference date for --calendar, used instead of the current day
    #[arg(long, global = true, requires = "calendar")]
    today: Option<NaiveDate>,
}

impl From<PeriodArgs> for PeriodRequest {
    fn from(args: PeriodArgs) -> Self {
        PeriodRequest {
            preset: args.preset,
            from: args.from,
            to: args.to,
            calendar: args.calendar,
            today: args.today,
        }
    }
}

impl From<Commands> for brokerscope::AppCommand {
    fn from(cmd: Commands) -> brokerscope::AppCommand {
        match cmd {
            Commands::Periods { json } => brokerscope::AppCommand::Periods { json },
            Commands::Overview => brokerscope::AppCommand::Overview,
            Commands::Custody { broker } => brokerscope::AppCommand::Custody { broker },
            Commands::BuyersSellers { broker } => {
                brokerscope::AppCommand::BuyersSellers { broker }
            }
            Commands::Top { mode, top_n } => brokerscope::AppCommand::Top { mode, top_n },
            Commands::Weekly { top_n } => brokerscope::AppCommand::Weekly { top_n },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the current and previous comparison windows
    Periods {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display period metrics against the previous window
    Overview,
    /// Display custody balance changes per broker
    Custody {
        /// Only list this broker
        #[arg(short, long)]
        broker: Option<String>,
    },
    /// Classify brokers as buyers or sellers by custody change
    BuyersSellers {
        /// Only list this broker
        #[arg(short, long)]
        broker: Option<String>,
    },
    /// Rank top buyers and sellers by volume
    Top {
        /// Gross volumes or net (buy - sell) volume
        #[arg(short, long, value_enum, default_value_t = RankMode::Gross)]
        mode: RankMode,
        /// Number of brokers per side
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
    /// Display net buyers and sellers for the most recent weeks
    Weekly {
        /// Number of brokers per side
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = brokerscope::RunOptions {
        config_path: cli.config_path,
        data_path: cli.data,
        period: cli.period.into(),
        raw: cli.raw,
    };

    let result = match cli.command {
        Some(Commands::Setup) => brokerscope::cli::setup::setup(),
        Some(cmd) => brokerscope::run_command(cmd.into(), &options),
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
