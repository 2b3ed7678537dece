use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "ducktor-cli")]
#[command(about = "Query a running ducktor monitor", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate health; exits 1 if any service is unhealthy
    Health,
    /// Health of a single service
    Service {
        name: String,
    },
    /// Latency, counters and thresholds per service
    Info,
    /// Monitor version and service count
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = endpoint(&cli.url, &cli.command)?;

    let res = client.get(url).send().await?;
    let passed = print_response(res).await?;

    if !passed && matches!(cli.command, Commands::Health | Commands::Service { .. }) {
        std::process::exit(1);
    }

    Ok(())
}

/// Resolve the request URL; the service name is sent as one encoded segment.
fn endpoint(base: &str, command: &Commands) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| format!("`{}` cannot be used as a base URL", base))?;
        segments.pop_if_empty();
        match command {
            Commands::Health => {
                segments.push("health");
            }
            Commands::Service { name } => {
                segments.extend(["health", name.as_str()]);
            }
            Commands::Info => {
                segments.push("info");
            }
            Commands::Status => {
                segments.push("status");
            }
        }
    }
    Ok(url)
}

/// Pretty-print the JSON body; returns whether the status was a success.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if !status.is_success() => {
            eprintln!("Error: monitor returned status {}", status);
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(status.is_success())
}
