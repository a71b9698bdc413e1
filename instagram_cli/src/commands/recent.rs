use anyhow::Result;
use clap::Args;
use instagram_api::{Context, RecentMediaQuery};

use crate::config::Settings;
use crate::output::{print_media, OutputFormat};

#[derive(Args)]
pub struct RecentArgs {
    /// Number of media to return
    #[arg(long, default_value = "3")]
    pub count: u32,

    /// Return media older than this ID
    #[arg(long)]
    pub max_id: Option<String>,

    /// Return media newer than this ID
    #[arg(long)]
    pub min_id: Option<String>,
}

pub async fn run(args: &RecentArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let mut query = RecentMediaQuery::default().with_count(args.count);
    if let Some(ref max_id) = args.max_id {
        query = query.with_max_id(max_id);
    }
    if let Some(ref min_id) = args.min_id {
        query = query.with_min_id(min_id);
    }

    let client = settings.client(format.keeps_raw_body())?;
    let resp = client.get_recent_media(&Context::new(), &query).await?;

    if let Some(next) = resp.pagination.as_ref().and_then(|p| p.next_max_id.as_deref()) {
        eprintln!("{} media, next page: --max-id {}", resp.data.len(), next);
    } else {
        eprintln!("{} media", resp.data.len());
    }

    print_media(&resp, &resp.data, resp.raw_body.as_deref(), format)
}
