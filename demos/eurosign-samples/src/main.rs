#![allow(missing_docs)]
use anyhow::{Context, Result, bail};
use eurosign_client::{AccessTokenResponse, Credentials, TokenClient};
use tracing::{info, warn};

const USAGE: &str = "\
Usage: eurosign-samples [--token-url <URL>] [--api-url <URL>] <COMMAND>

Commands:
  obtain --code <CODE>                   exchange an authorization code
  refresh --refresh-token <TOKEN>        exchange a refresh token
  current-user --access-token <TOKEN>    fetch the authenticated user

Credentials are read from EUROSIGN_CLIENT_ID and EUROSIGN_CLIENT_SECRET.";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let AppArgs {
        token_url,
        api_url,
        command,
    } = AppArgs::parse().context("parsing arguments")?;

    let mut builder = TokenClient::builder();
    if let Some(token_url) = token_url {
        builder = builder.with_token_url(token_url)?;
    }
    if let Some(api_url) = api_url {
        builder = builder.with_api_base_url(api_url)?;
    }
    let client = builder.build()?;

    match command {
        Command::Obtain { code } => {
            let credentials = Credentials::from_env()?;
            let tokens = client.obtain_access_token(&credentials, &code).await?;
            print_tokens(&tokens)?;
        }
        Command::Refresh { refresh_token } => {
            let credentials = Credentials::from_env()?;
            let tokens = client
                .refresh_access_token(&credentials, &refresh_token)
                .await?;
            print_tokens(&tokens)?;
        }
        Command::CurrentUser { access_token } => {
            let user = client.get_current_user(&access_token).await?;
            info!(uuid = %user.uuid, name = %user.full_name(), "current user");
            print_json(&serde_json::to_string_pretty(&user)?);
        }
    }

    Ok(())
}

fn print_tokens(tokens: &AccessTokenResponse) -> Result<()> {
    print_json(&serde_json::to_string_pretty(tokens)?);
    info!(
        expires_in = tokens.expires_in().as_secs(),
        scope = tokens.scope(),
        "access token issued"
    );
    warn!("store the new refresh token, the previous one can no longer be used");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_json(json: &str) {
    println!("{json}");
}

#[derive(Debug)]
enum Command {
    Obtain { code: String },
    Refresh { refresh_token: String },
    CurrentUser { access_token: String },
}

#[derive(Debug)]
struct AppArgs {
    token_url: Option<String>,
    api_url: Option<String>,
    command: Command,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let token_url = pargs
            .opt_value_from_str("--token-url")
            .context("parsing token URL argument")?;

        let api_url = pargs
            .opt_value_from_str("--api-url")
            .context("parsing API URL argument")?;

        let subcommand = pargs.subcommand().context("parsing command")?;
        let command = match subcommand.as_deref() {
            Some("obtain") => Command::Obtain {
                code: pargs
                    .value_from_str("--code")
                    .context("parsing code argument")?,
            },
            Some("refresh") => Command::Refresh {
                refresh_token: pargs
                    .value_from_str("--refresh-token")
                    .context("parsing refresh token argument")?,
            },
            Some("current-user") => Command::CurrentUser {
                access_token: pargs
                    .value_from_str("--access-token")
                    .context("parsing access token argument")?,
            },
            Some(other) => bail!("unknown command '{other}'\n\n{USAGE}"),
            None => bail!("missing command\n\n{USAGE}"),
        };

        let result = Self {
            token_url,
            api_url,
            command,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(result)
    }
}
