use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, PgStore};

/// Open the Postgres store named by DATABASE_URL
pub async fn connect_store() -> anyhow::Result<PgStore> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;
    Ok(PgStore::new(pool))
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a single record: pretty JSON, or `key: value` lines for text
pub fn output_record(output_format: &OutputFormat, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => {
            if let Some(fields) = record.as_object() {
                for (key, value) in fields {
                    match value {
                        Value::String(s) => println!("{}: {}", key, s),
                        other => println!("{}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}
