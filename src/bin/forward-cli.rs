use clap::{Parser, Subcommand};
use serde_json::Value;

use request_forwarder::forward::{KeyValue, OutgoingRequestDescription};

#[derive(Parser)]
#[command(name = "forward-cli")]
#[command(about = "Send requests through a running request forwarder", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forward one request and print the normalized envelope
    Send {
        /// HTTP method (case-insensitive)
        method: String,
        /// Absolute target URL
        url: String,
        /// Header as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// Raw body content
        #[arg(long, conflicts_with_all = ["form", "urlencoded"])]
        raw: Option<String>,
        /// Multipart field as `key=value` (repeatable)
        #[arg(long, conflicts_with = "urlencoded")]
        form: Vec<String>,
        /// URL-encoded field as `key=value` (repeatable)
        #[arg(long)]
        urlencoded: Vec<String>,
        /// Timeout in milliseconds (0 uses the server default)
        #[arg(long)]
        timeout: Option<u64>,
        /// Return redirects instead of following them
        #[arg(long)]
        no_follow: bool,
        /// Skip certificate verification for this request
        #[arg(short = 'k', long)]
        insecure: bool,
    },
    /// List collections
    Collections,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Send {
            method,
            url,
            headers,
            raw,
            form,
            urlencoded,
            timeout,
            no_follow,
            insecure,
        } => {
            let mut description = OutgoingRequestDescription::new(method, url);
            for header in &headers {
                let (name, value) = split_pair(header, ':')?;
                description = description.header(name, value);
            }
            if let Some(content) = raw {
                description = description.raw(content);
            } else if !form.is_empty() {
                description = description.form_data(parse_pairs(&form)?);
            } else if !urlencoded.is_empty() {
                description = description.urlencoded(parse_pairs(&urlencoded)?);
            }
            if let Some(ms) = timeout {
                description = description.timeout_ms(ms);
            }
            if no_follow {
                description = description.follow_redirects(false);
            }
            if insecure {
                description = description.ssl_verification(false);
            }

            let res = client
                .post(format!("{}/api/proxy", cli.server))
                .json(&description)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Collections => {
            let res = client
                .get(format!("{}/api/collections", cli.server))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn split_pair(input: &str, separator: char) -> Result<(String, String), String> {
    input
        .split_once(separator)
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| format!("expected '{}' in '{}'", separator, input))
}

fn parse_pairs(inputs: &[String]) -> Result<Vec<KeyValue>, String> {
    inputs
        .iter()
        .map(|input| split_pair(input, '=').map(|(k, v)| KeyValue::new(k, v)))
        .collect()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        eprintln!("Forwarder answered with status {}", status);
    }
    Ok(())
}
