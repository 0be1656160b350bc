use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movies-cli")]
#[command(about = "Command-line client for the movies API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:1234")]
    url: String,

    /// Value sent as the Origin header, if any.
    #[arg(short, long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List movies, optionally filtered by genre
    List {
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Show one movie
    Get { id: String },
    /// Create a movie from a JSON file
    Create { file: PathBuf },
    /// Apply a partial update from a JSON file
    Update { id: String, file: PathBuf },
    /// Delete a movie
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let movies_url = format!("{}/movies", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::List { genre } => {
            let mut req = client.get(&movies_url);
            if let Some(genre) = genre {
                req = req.query(&[("genre", genre)]);
            }
            req
        }
        Commands::Get { id } => client.get(format!("{}/{}", movies_url, id)),
        Commands::Create { file } => client.post(&movies_url).json(&read_json(&file)?),
        Commands::Update { id, file } => client
            .request(Method::PATCH, format!("{}/{}", movies_url, id))
            .json(&read_json(&file)?),
        Commands::Delete { id } => client.delete(format!("{}/{}", movies_url, id)),
    };

    let request = match cli.origin {
        Some(origin) => request.header(reqwest::header::ORIGIN, origin),
        None => request,
    };

    print_response(request.send().await?).await
}

fn read_json(path: &PathBuf) -> Result<Value, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", body);
    } else {
        eprintln!("Error: movies API returned status {}", status);
        eprintln!("Response: {}", body);
    }
    Ok(())
}
