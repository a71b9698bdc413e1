use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use instagram_api::Context;
use url::Url;

use crate::config::Settings;

const STATE: &str = "mystate";

/// Walks through the OAuth code flow on the terminal and prints the token.
pub async fn run(settings: &Settings) -> Result<()> {
    let oauth = settings.oauth()?;

    println!("\nVisit this url:\n{}", oauth.authorize_url(STATE));
    print!("\nEnter the resulting url:\n");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let redirect = Url::parse(line.trim()).context("could not parse url")?;

    let code = oauth
        .code_from_redirect(&redirect, STATE)
        .context("could not get code from url")?;
    let token = oauth
        .access_token(&Context::new(), &code)
        .await
        .context("could not get access token")?;

    println!("\n{}", token);
    Ok(())
}
