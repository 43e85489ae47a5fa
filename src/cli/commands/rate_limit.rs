use anyhow::anyhow;
use clap::Subcommand;
use serde_json::Value;

use crate::cli::utils::{api_error_parts, output_error, output_success};
use crate::cli::OutputFormat;

use super::DEFAULT_SERVER_URL;

#[derive(Subcommand)]
pub enum RateLimitCommands {
    #[command(about = "Clear every login/register lockout on the server")]
    Reset {
        #[arg(long, default_value = DEFAULT_SERVER_URL, help = "Server base URL")]
        url: String,
        #[arg(long, help = "Admin JWT (defaults to RACEHUB_TOKEN)")]
        token: Option<String>,
    },
}

pub async fn handle(cmd: RateLimitCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RateLimitCommands::Reset { url, token } => {
            let token = token
                .or_else(|| std::env::var("RACEHUB_TOKEN").ok())
                .ok_or_else(|| anyhow!("an admin token is required (--token or RACEHUB_TOKEN)"))?;

            let endpoint = format!("{}/api/admin/rate-limit/reset", url.trim_end_matches('/'));
            let response = reqwest::Client::new()
                .post(&endpoint)
                .bearer_auth(token)
                .send()
                .await?;

            let status = response.status();
            let body: Value = response.json().await.unwrap_or(Value::Null);

            if !status.is_success() {
                let (message, code) = api_error_parts(&body);
                output_error(output_format, &message, code.as_deref())?;
                return Err(anyhow!("rate limit reset failed with HTTP {}", status));
            }

            let data = body.get("data").cloned();
            let cleared = data
                .as_ref()
                .and_then(|d| d.get("cleared"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            output_success(
                output_format,
                &format!("Rate limiter reset ({} clients cleared)", cleared),
                data,
            )
        }
    }
}
