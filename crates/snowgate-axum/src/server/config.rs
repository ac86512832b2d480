use anyhow::{Context, bail};
use clap::Parser;
use snowgate::SnowflakeDiscordId;
use std::{collections::HashMap, fmt, net::SocketAddr};

/// Runtime configuration for the `snowgate-axum` binary.
///
/// All values are parsed from CLI arguments or environment variables. A
/// `.env` file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgate-axum",
    version,
    about = "An HTTP service for decoding Discord snowflakes behind a bearer-token gate"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:3000"))]
    pub server_addr: String,

    /// Bearer tokens accepted by protected routes, each bound to the Discord
    /// user it authenticates, as a comma-separated list of `token=user_id`.
    ///
    /// Example: "s3cret=175928847299117063,other=80351110224678912"
    ///
    /// Environment variable: `API_TOKENS`
    #[arg(long, env = "API_TOKENS", value_delimiter = ',', hide_env_values = true)]
    pub api_tokens: Vec<String>,
}

#[derive(Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub api_tokens: HashMap<String, SnowflakeDiscordId>,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr = args
            .server_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("SERVER_ADDR {:?} is not a socket address", args.server_addr))?;

        let mut api_tokens = HashMap::with_capacity(args.api_tokens.len());
        for entry in args.api_tokens.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
            let Some((token, user_id)) = entry.split_once('=') else {
                bail!("API_TOKENS entry must look like `token=user_id`");
            };
            if token.is_empty() {
                bail!("API_TOKENS entry has an empty token");
            }
            let user_id = user_id
                .parse::<SnowflakeDiscordId>()
                .context("API_TOKENS entry has an invalid user id")?;
            api_tokens.insert(token.to_owned(), user_id);
        }

        if api_tokens.is_empty() {
            bail!("API_TOKENS must contain at least one token");
        }

        Ok(Self {
            server_addr,
            api_tokens,
        })
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are secrets; only their count is shown.
        f.debug_struct("ServerConfig")
            .field("server_addr", &self.server_addr)
            .field("api_tokens", &self.api_tokens.len())
            .finish()
    }
}
