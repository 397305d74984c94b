use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::APP_NAME;
use anyhow::Result;

pub struct SearchCommand {
    pub query: String,
    pub config: AppConfig,
}

impl CliCommand for SearchCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        if controller.catalog().is_empty() {
            ui.print_error(&format!(
                "Playlist is empty. Run '{} add <URL|FILE|DIR>' first.",
                APP_NAME
            ));
            return Ok(());
        }

        let results = controller.catalog().search(&self.query);
        ui.print_search_results(&self.query, &results);

        Ok(())
    }
}
