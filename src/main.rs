use clap::Parser;
use helmsman::core::config;
use helmsman::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "helmsman", about = "Terminal console for a game server admin panel")]
struct Args {
    /// Panel base URL, e.g. http://localhost:8083 (overrides config and env)
    #[arg(short, long)]
    server: Option<String>,

    /// Name to chat as (overrides config and env)
    #[arg(short, long)]
    author: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to helmsman.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("helmsman.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            log::warn!("Falling back to default config: {}", e);
            config::HelmsmanConfig::default()
        }
    };
    let resolved = config::resolve(&file_config, args.server.as_deref(), args.author.as_deref());

    log::info!(
        "Helmsman starting up against {} (chat {})",
        resolved.base_url,
        if resolved.chat_enabled { "on" } else { "off" }
    );

    tui::run(resolved)
}
