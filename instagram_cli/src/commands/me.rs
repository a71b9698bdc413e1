use anyhow::Result;
use instagram_api::Context;

use crate::config::Settings;
use crate::output::{print_user, OutputFormat};

pub async fn run(settings: &Settings, format: OutputFormat) -> Result<()> {
    let client = settings.client(format.keeps_raw_body())?;
    let resp = client.get_self(&Context::new()).await?;

    print_user(
        &resp,
        resp.data.as_ref(),
        resp.raw_body.as_deref(),
        format,
    )
}
