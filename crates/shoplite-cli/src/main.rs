use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use shoplite_cli::display::{self, Tag};
use shoplite_cli::repl::{self, Repl};
use shoplite_client::HttpQaClient;
use std::fs::OpenOptions;

#[derive(Parser, Debug)]
#[clap(
    name = "shoplite-chat",
    version = "0.1.0",
    about = "Interactive client for the Shoplite question-answering service"
)]
struct Cli {
    #[clap(
        long,
        short,
        default_value = "info",
        help = "Level for the diagnostic log file"
    )]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to a file so they never interleave with the chat prompt.
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    if let Ok(log_file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("shoplite_chat.log")
    {
        env_logger::Builder::new()
            .filter_level(log_level_filter)
            .target(env_logger::Target::Pipe(Box::new(log_file)))
            .init();
    }

    print!("{}", display::banner());

    let mut lines = repl::stdin_lines();
    let endpoint = match repl::acquire_endpoint(&mut lines).await? {
        Some(endpoint) => endpoint,
        // Interrupted at the URL prompt.
        None => return Ok(()),
    };
    log::info!("session endpoint: {endpoint}");

    println!("\n{}", Tag::Positive.paint("Connected successfully!"));
    println!("\nType your questions about Shoplite below.");
    println!(
        "Type '{}' for commands or '{}' to exit.\n",
        Tag::Emphasis.paint("help"),
        Tag::Emphasis.paint("quit")
    );

    let client = HttpQaClient::new(endpoint.clone());
    let mut repl = Repl::new(endpoint, Box::new(client));
    repl.run(&mut lines).await
}
