use crate::application::config::AppConfig;
use crate::cli_handlers::{CliCommand, open_silent_controller};
use crate::core::models::RepeatMode;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::{percent_to_volume, volume_to_percent};
use anyhow::Result;

// ── Volume ────────────────────────────────────────────────────────────────────
pub struct VolumeCommand {
    pub volume: Option<u8>,
    pub config: AppConfig,
}

impl CliCommand for VolumeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        match self.volume {
            Some(percent) => {
                controller.set_volume(percent_to_volume(percent));
                ui.print_message(&format!("Volume set to: {}%", percent));
            }
            None => {
                let session = controller.session();
                let suffix = if session.is_muted { " (muted)" } else { "" };
                ui.print_message(&format!(
                    "Current volume: {}%{}",
                    volume_to_percent(session.volume),
                    suffix
                ));
            }
        }

        Ok(())
    }
}

// ── Mute ──────────────────────────────────────────────────────────────────────
pub struct MuteCommand {
    pub config: AppConfig,
}

impl CliCommand for MuteCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        controller.toggle_mute();
        let session = controller.session();
        if session.is_muted {
            ui.print_message("Muted");
        } else {
            ui.print_message(&format!(
                "Unmuted, volume {}%",
                volume_to_percent(session.volume)
            ));
        }

        Ok(())
    }
}

// ── Shuffle ───────────────────────────────────────────────────────────────────
pub struct ShuffleCommand {
    pub enabled: Option<bool>,
    pub config: AppConfig,
}

impl CliCommand for ShuffleCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        let enabled = match self.enabled {
            Some(enabled) => {
                controller.set_shuffle(enabled);
                enabled
            }
            None => controller.toggle_shuffle(),
        };

        ui.print_message(&format!("Shuffle set to: {}", enabled));
        Ok(())
    }
}

// ── Repeat ────────────────────────────────────────────────────────────────────
pub struct RepeatCommand {
    pub mode: Option<RepeatMode>,
    pub config: AppConfig,
}

impl CliCommand for RepeatCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        let mode = match self.mode {
            Some(mode) => {
                controller.set_repeat_mode(mode);
                mode
            }
            None => controller.toggle_repeat_mode(),
        };

        ui.print_message(&format!(
            "Repeat mode set to: {} {} {}",
            mode.symbol(),
            mode,
            repeat_mode_description(mode),
        ));
        Ok(())
    }
}

/// Human-readable label used in terminal feedback messages
fn repeat_mode_description(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Off => "(stop at end of track)",
        RepeatMode::All => "(continue through the playlist)",
        RepeatMode::One => "(repeat current track)",
    }
}

// ── Rate ──────────────────────────────────────────────────────────────────────
pub struct RateCommand {
    pub rate: Option<f32>,
    pub config: AppConfig,
}

impl CliCommand for RateCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let mut controller = open_silent_controller(&self.config)?;
        let ui = TerminalRenderer::new();

        match self.rate {
            Some(rate) if rate.is_finite() && rate > 0.0 => {
                controller.set_playback_rate(rate);
                ui.print_message(&format!("Playback rate set to: {}x", rate));
            }
            Some(rate) => ui.print_error(&format!("Invalid playback rate: {}", rate)),
            None => ui.print_message(&format!(
                "Current playback rate: {}x",
                controller.session().playback_rate
            )),
        }

        Ok(())
    }
}
