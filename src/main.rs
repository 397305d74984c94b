mod application;
mod cli;
mod cli_handlers;
mod core;
mod modules;
mod utils;

#[cfg(test)]
mod testing;

use application::config::AppConfig;
use clap::Parser;
use cli::Cli;
use modules::ui::terminal::renderer::TerminalRenderer;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = AppConfig::load(cli.config.as_deref())
        .and_then(|config| cli_handlers::from_cli(cli.command, config).execute());

    if let Err(e) = result {
        TerminalRenderer::new().print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
