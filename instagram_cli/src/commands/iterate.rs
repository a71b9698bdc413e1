use anyhow::{bail, Result};
use clap::Args;
use instagram_api::{Context, RecentMediaQuery};

use crate::config::Settings;
use crate::output::{print_media, OutputFormat};

#[derive(Args)]
pub struct IterateArgs {
    /// Page size requested from the server
    #[arg(long, default_value = "20")]
    pub count: u32,

    /// Stop after this many media
    #[arg(long)]
    pub limit: Option<usize>,
}

pub async fn run(args: &IterateArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    if format.keeps_raw_body() {
        bail!("raw output is not available when iterating");
    }
    if args.limit == Some(0) {
        bail!("--limit must be at least 1");
    }

    let client = settings.client(false)?;
    let ctx = Context::new();
    let query = RecentMediaQuery::default().with_count(args.count);
    let first = client.get_recent_media(&ctx, &query).await?;

    let mut stream = client.iterate_media(&ctx, first);
    let mut media = Vec::new();
    let mut stopped = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            item = stream.next() => match item {
                Some(m) => {
                    media.push(m);
                    if args.limit.is_some_and(|limit| media.len() >= limit) {
                        stopped = true;
                        break;
                    }
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, stopping iteration");
                stopped = true;
                break;
            }
        }
    }

    if stopped {
        ctx.cancel();
    }
    match stream.finish().await {
        Ok(()) => {}
        Err(e) if stopped && e.is_context() => {}
        Err(e) => {
            // Whatever arrived before the failure is still worth showing.
            eprintln!("Iteration failed after {} media: {}", media.len(), e);
            print_media(&media, &media, None, format)?;
            return Err(e.into());
        }
    }

    eprintln!("{} media", media.len());
    print_media(&media, &media, None, format)
}
