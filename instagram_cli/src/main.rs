mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "instagram")]
#[command(about = "Query the Instagram API with signed requests")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "json", global = true)]
    out: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the authenticated user
    Me,
    /// List recent media of the authenticated user
    Recent(commands::recent::RecentArgs),
    /// List recent comments on a media
    Comments(commands::comments::CommentsArgs),
    /// Walk every page of recent media, oldest first within each page
    Iterate(commands::iterate::IterateArgs),
    /// Obtain an access token through the OAuth code flow
    AccessToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("instagram=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match &cli.command {
        Commands::Me => commands::me::run(&settings, cli.out).await?,
        Commands::Recent(args) => commands::recent::run(args, &settings, cli.out).await?,
        Commands::Comments(args) => commands::comments::run(args, &settings, cli.out).await?,
        Commands::Iterate(args) => commands::iterate::run(args, &settings, cli.out).await?,
        Commands::AccessToken => commands::access_token::run(&settings).await?,
    }

    Ok(())
}
