use clap::Parser;
use tracing_subscriber::EnvFilter;

use book_shelf::config::{Cli, Command, Config};
use book_shelf::interface::{mcp, menu};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from(&cli);

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&config),
        Command::Mcp => mcp::run(&config).await,
    }
}

/// ログはstderrへ。stdoutはメニュー表示とMCPのstdioトランスポートが使う。
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
