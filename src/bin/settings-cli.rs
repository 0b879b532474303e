use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{Map, Value};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Management CLI for the settings service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin bearer token (needed for writes).
    #[arg(short, long, env = "SETTINGS_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current settings
    Get,
    /// Print the settings schema
    Schema,
    /// Change fields: section.field=value ...
    Set {
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Submit a JSON settings document from a file
    Apply { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let settings_url = format!("{}/settings", cli.url);

    match cli.command {
        Commands::Get => {
            let res = client.get(&settings_url).send().await?;
            print_response(res).await?;
        }
        Commands::Schema => {
            let res = client.get(format!("{}/schema", settings_url)).send().await?;
            print_response(res).await?;
        }
        Commands::Set { assignments } => {
            let mut document: Value = client
                .get(&settings_url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            for assignment in &assignments {
                let (section, field, value) = parse_assignment(assignment)?;
                merge_field(&mut document, section, field, value);
            }
            let res = client
                .post(&settings_url)
                .headers(headers)
                .json(&document)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Apply { file } => {
            let document: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let res = client
                .post(&settings_url)
                .headers(headers)
                .json(&document)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Split `section.field=value`. The value is JSON when it parses, else a string.
fn parse_assignment(assignment: &str) -> Result<(&str, &str, Value), String> {
    let (path, raw) = assignment
        .split_once('=')
        .ok_or_else(|| format!("expected section.field=value, got '{}'", assignment))?;
    let (section, field) = path
        .split_once('.')
        .filter(|(s, f)| !s.is_empty() && !f.is_empty())
        .ok_or_else(|| format!("expected section.field before '=', got '{}'", path))?;

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((section, field, value))
}

fn merge_field(document: &mut Value, section: &str, field: &str, value: Value) {
    if !document.is_object() {
        *document = Value::Object(Map::new());
    }
    if let Value::Object(sections) = document {
        let entry = sections
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(fields) = entry {
            fields.insert(field.to_string(), value);
        }
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    for error in res.headers().get_all("x-settings-error") {
        eprintln!("Warning: {}", error.to_str().unwrap_or("<non-ascii>"));
    }

    if !status.is_success() {
        eprintln!("Error: settings API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
