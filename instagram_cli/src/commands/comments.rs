use anyhow::{bail, Result};
use clap::Args;
use instagram_api::Context;

use crate::config::Settings;
use crate::output::{print_comments, OutputFormat};

#[derive(Args)]
pub struct CommentsArgs {
    /// ID of the media to get comments for
    #[arg(long)]
    pub id: String,
}

pub async fn run(args: &CommentsArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let id = args.id.trim();
    if id.is_empty() || id.contains('/') {
        bail!("invalid media id: {:?}", args.id);
    }

    let client = settings.client(format.keeps_raw_body())?;
    let resp = client
        .get_media_recent_comments(&Context::new(), id)
        .await?;

    eprintln!("{} comments", resp.data.len());
    print_comments(&resp, &resp.data, resp.raw_body.as_deref(), format)
}
