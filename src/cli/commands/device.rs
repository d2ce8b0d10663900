use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::utils::output_record;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum DeviceCommands {
    #[command(about = "Send one status update as a device would")]
    Report {
        #[arg(long, default_value = "http://127.0.0.1:5000", help = "Server base URL")]
        server: String,
        #[arg(long, help = "Device id")]
        id: String,
        #[arg(long, help = "Status payload")]
        status: String,
    },
}

pub async fn handle(cmd: DeviceCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        DeviceCommands::Report { server, id, status } => {
            let url = format!("{}/update_status", server.trim_end_matches('/'));
            let res = reqwest::Client::new()
                .post(&url)
                .json(&json!({ "id": id, "status": status }))
                .send()
                .await?;

            let code = res.status();
            let body: Value = res.json().await?;
            if !code.is_success() {
                let message = body.get("error").and_then(Value::as_str).unwrap_or("request failed");
                anyhow::bail!("{} ({})", message, code);
            }

            output_record(&output_format, &body)
        }
    }
}
