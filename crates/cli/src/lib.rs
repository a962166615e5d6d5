pub mod commands;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "interiq",
    about = "Interiq operator CLI",
    long_about = "Price interior packages, score leads, and inspect the rate catalog and configuration.",
    after_help = "Examples:\n  interiq estimate --carpet-area 1300 --budget 900000 --room Kitchen\n  interiq score --budget 2000000 --carpet-area 2500 --timeline \"1-3 months\"\n  interiq catalog\n  interiq config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Compute a cost estimate, package tier, and payment schedule")]
    Estimate(EstimateArgs),
    #[command(about = "Score lead quality from budget, rooms, timeline, area, and property type")]
    Score(ScoreArgs),
    #[command(about = "Validate the configured rate catalog and print a summary")]
    Catalog,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[arg(long, help = "Carpet area in square feet")]
    pub carpet_area: Decimal,
    #[arg(long, help = "Client budget in whole currency units")]
    pub budget: Decimal,
    #[arg(long = "room", help = "Room to price; repeat for several, omit for every room")]
    pub rooms: Vec<String>,
}

#[derive(Debug, Default, Args)]
pub struct ScoreArgs {
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub budget: Decimal,
    #[arg(long, default_value_t = Decimal::ZERO)]
    pub carpet_area: Decimal,
    #[arg(long = "room")]
    pub rooms: Vec<String>,
    #[arg(long, default_value = "")]
    pub timeline: String,
    #[arg(long, default_value = "")]
    pub property_type: String,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Estimate(args) => commands::estimate::run(&args),
        Command::Score(args) => commands::score::run(&args),
        Command::Catalog => commands::catalog::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
