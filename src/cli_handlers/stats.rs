use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::modules::ui::progress_formatter::format_listening_time;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::Result;

pub struct StatsCommand {
    pub config: AppConfig,
}

impl CliCommand for StatsCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let controller = open_silent_controller(&self.config)?;
        let catalog = controller.catalog();
        let ui = TerminalRenderer::new();

        ui.print_stats(
            &controller.stats(),
            catalog.len(),
            catalog.favorites().len(),
        );
        ui.print_message(&format!(
            "Playlist length:    {}",
            format_listening_time(catalog.total_duration())
        ));

        Ok(())
    }
}
