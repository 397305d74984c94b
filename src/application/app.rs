use crate::application::handlers::{CommandHandler, CommandOutcome};
use crate::core::events::{MediaEventReceiver, PlayerEvent, PlayerEventReceiver};
use crate::core::traits::UiRenderer;
use crate::modules::playback::controller::PlaybackController;
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::info;

/// How long a status message stays on screen.
const MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Interactive player: wires the controller to media events and the UI.
pub struct Application {
    controller: PlaybackController,
    handler: CommandHandler,
    player_events: PlayerEventReceiver,

    // Module references
    media_events: Option<MediaEventReceiver>,
    ui_renderer: Option<Box<dyn UiRenderer>>,

    message: Option<(String, Instant)>,
    running: bool,
}

impl Application {
    pub fn new(mut controller: PlaybackController) -> Self {
        let player_events = controller.subscribe();

        Self {
            controller,
            handler: CommandHandler,
            player_events,
            media_events: None,
            ui_renderer: None,
            message: None,
            running: false,
        }
    }

    /// Set the channel the media surface reports on
    pub fn with_media_events(mut self, events: MediaEventReceiver) -> Self {
        self.media_events = Some(events);
        self
    }

    /// Set the UI renderer
    pub fn with_ui_renderer(mut self, renderer: Box<dyn UiRenderer>) -> Self {
        self.ui_renderer = Some(renderer);
        self
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController {
        &mut self.controller
    }

    /// Initialize the application
    pub fn init(&mut self) -> Result<()> {
        if let Some(ui) = &mut self.ui_renderer {
            ui.init()?;
        }
        Ok(())
    }

    /// Run the main event loop until the user quits
    pub fn run(&mut self) -> Result<()> {
        self.running = true;

        while self.running {
            self.run_once()?;

            // Small sleep to prevent CPU spinning
            std::thread::sleep(Duration::from_millis(16)); // ~60 FPS
        }

        Ok(())
    }

    /// One pass of the loop: timers, media events, input, notifications, render.
    pub fn run_once(&mut self) -> Result<()> {
        self.controller.tick();
        self.process_media_events();

        if let Some(ui) = &mut self.ui_renderer {
            for command in ui.poll_input()? {
                match self.handler.handle(command, &mut self.controller) {
                    CommandOutcome::Continue(Some(text)) => {
                        self.message = Some((text, Instant::now()));
                    }
                    CommandOutcome::Continue(None) => {}
                    CommandOutcome::Quit => {
                        info!("quit requested");
                        self.running = false;
                    }
                }
            }
        }

        self.process_player_events();
        self.render()
    }

    fn process_media_events(&mut self) {
        let Some(events) = &self.media_events else {
            return;
        };
        // Drain all events currently in queue
        while let Ok(event) = events.try_recv() {
            self.controller.handle_media_event(event);
        }
    }

    fn process_player_events(&mut self) {
        while let Ok(event) = self.player_events.try_recv() {
            match event {
                PlayerEvent::Failure { error } => {
                    self.message = Some((format!("Error: {}", error), Instant::now()));
                }
                PlayerEvent::AutoAdvanceScheduled { attempt } => {
                    self.message = Some((
                        format!("Skipping to next track (attempt {})", attempt),
                        Instant::now(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// The message still on screen, if it has not expired.
    pub fn current_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|(_, shown_at)| shown_at.elapsed() < MESSAGE_TTL)
            .map(|(text, _)| text.as_str())
    }

    fn render(&mut self) -> Result<()> {
        let snapshot = self.controller.snapshot();
        let message = self.current_message().map(str::to_owned);
        if let Some(ui) = &mut self.ui_renderer {
            ui.render(&snapshot, message.as_deref())?;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Persist everything and restore the terminal
    pub fn cleanup(&mut self) -> Result<()> {
        self.controller.flush();

        if let Some(ui) = &mut self.ui_renderer {
            ui.cleanup()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ControllerSettings;
    use crate::application::state::PlayerSnapshot;
    use crate::core::events::{LoadToken, MediaEvent, UiCommand};
    use crate::core::models::{SourceKind, TrackInput, TransportState};
    use crate::testing::{RecordingSurface, SharedStore, input};
    use crossbeam_channel::unbounded;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Default)]
    struct ScriptedUi {
        commands: VecDeque<Vec<UiCommand>>,
        frames: Rc<RefCell<Vec<(PlayerSnapshot, Option<String>)>>>,
        cleaned_up: Rc<RefCell<bool>>,
    }

    impl UiRenderer for ScriptedUi {
        fn init(&mut self) -> Result<()> {
            Ok(())
        }

        fn cleanup(&mut self) -> Result<()> {
            *self.cleaned_up.borrow_mut() = true;
            Ok(())
        }

        fn render(&mut self, snapshot: &PlayerSnapshot, message: Option<&str>) -> Result<()> {
            self.frames
                .borrow_mut()
                .push((snapshot.clone(), message.map(str::to_owned)));
            Ok(())
        }

        fn poll_input(&mut self) -> Result<Vec<UiCommand>> {
            Ok(self
                .commands
                .pop_front()
                .unwrap_or_else(|| vec![UiCommand::Quit]))
        }
    }

    fn controller(titles: &[&str], store: SharedStore) -> PlaybackController {
        let mut controller = PlaybackController::new(
            Box::new(RecordingSurface::new()),
            Box::new(store),
            ControllerSettings::default(),
        );
        for title in titles {
            controller.add_track(input(title), SourceKind::Online);
        }
        controller
    }

    #[test]
    fn media_events_reach_the_controller() {
        let (tx, rx) = unbounded();
        let ui = ScriptedUi {
            commands: VecDeque::from(vec![vec![UiCommand::TogglePlayPause], vec![]]),
            ..ScriptedUi::default()
        };
        let frames = ui.frames.clone();

        let mut app = Application::new(controller(&["A"], SharedStore::default()))
            .with_media_events(rx)
            .with_ui_renderer(Box::new(ui));
        app.init().unwrap();

        app.run_once().unwrap();
        assert_eq!(app.controller().session().transport, TransportState::Loading);

        tx.send(MediaEvent::LoadedMetadata {
            token: LoadToken(1),
            duration: 120.0,
        })
        .unwrap();
        app.run_once().unwrap();

        let frames = frames.borrow();
        let (last, _) = frames.last().unwrap();
        assert_eq!(last.session.transport, TransportState::Playing);
        assert_eq!(last.session.duration, 120.0);
    }

    #[test]
    fn command_messages_are_rendered() {
        let ui = ScriptedUi {
            commands: VecDeque::from(vec![vec![UiCommand::ToggleShuffle]]),
            ..ScriptedUi::default()
        };
        let frames = ui.frames.clone();

        let mut app = Application::new(controller(&[], SharedStore::default()))
            .with_ui_renderer(Box::new(ui));
        app.run_once().unwrap();

        assert_eq!(frames.borrow()[0].1.as_deref(), Some("Shuffle on"));
        assert_eq!(app.current_message(), Some("Shuffle on"));
    }

    #[test]
    fn failures_become_messages() {
        let mut app = Application::new(controller(&[], SharedStore::default()));
        app.controller_mut()
            .add_track(TrackInput::titled("No Source"), SourceKind::Online);
        let _ = app.controller_mut().play_index(0);

        app.run_once().unwrap();
        let message = app.current_message().unwrap();
        assert!(message.starts_with("Skipping to next track") || message.starts_with("Error:"));
    }

    #[test]
    fn run_stops_on_quit_and_cleanup_flushes() {
        let store = SharedStore::default();
        let ui = ScriptedUi::default();
        let cleaned_up = ui.cleaned_up.clone();

        let mut app =
            Application::new(controller(&["A"], store.clone())).with_ui_renderer(Box::new(ui));
        app.run().unwrap();
        assert!(!app.is_running());

        app.cleanup().unwrap();
        assert!(*cleaned_up.borrow());
        assert_eq!(store.value("player_volume").as_deref(), Some("0.7"));
    }
}
