use crate::application::config::ControllerSettings;
use crate::application::state::{PlaybackSession, PlayerSnapshot};
use crate::core::error::{PlayerError, SurfaceError};
use crate::core::events::{LoadToken, MediaEvent, PlayerEvent, PlayerEventReceiver};
use crate::core::models::{
    PlaybackStats, RepeatMode, SourceKind, Track, TrackInput, TransportState, sanitize_seconds,
};
use crate::core::traits::{Clock, KeyValueStore, MediaSurface, SourceDescriptor, SystemClock};
use crate::modules::library::catalog::TrackCatalog;
use crate::modules::library::search_engine::SearchEngine;
use crate::modules::playback::navigator::{Direction, QueueNavigator};
use crate::modules::storage::persistence::Persistence;
use crossbeam_channel::{Sender, unbounded};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// The load the controller currently listens to.
struct ActiveLoad {
    token: LoadToken,
    started_at: Instant,
    /// Metadata arrived; the surface can play and seek.
    ready: bool,
    /// Start output as soon as the load is ready.
    autoplay: bool,
    /// Seek requested before the load was ready.
    pending_seek: Option<f64>,
}

/// Playback state machine.
///
/// Owns the catalog and the session, drives a [`MediaSurface`] and reacts to the
/// [`MediaEvent`]s it produces. Every `load` gets a fresh [`LoadToken`]; events
/// carrying any other token are dropped, so at most one track is ever active.
pub struct PlaybackController {
    catalog: TrackCatalog,
    navigator: QueueNavigator,
    session: PlaybackSession,
    stats: PlaybackStats,
    current_track: Option<Track>,

    surface: Box<dyn MediaSurface>,
    persistence: Persistence,
    clock: Box<dyn Clock>,
    settings: ControllerSettings,
    subscribers: Vec<Sender<PlayerEvent>>,

    active_load: Option<ActiveLoad>,
    next_token: u64,
    /// Consecutive failures since playback last started or the user navigated.
    failure_streak: u32,
    /// When the scheduled auto-advance is due.
    pending_advance: Option<Instant>,
}

impl PlaybackController {
    /// Restores catalog, preferences and stats from `store`.
    pub fn new(
        mut surface: Box<dyn MediaSurface>,
        store: Box<dyn KeyValueStore>,
        settings: ControllerSettings,
    ) -> Self {
        let persistence = Persistence::new(store);
        let prefs = persistence.load_preferences();
        let stats = persistence.load_stats();
        let data = persistence.load_playlist();

        let stored_index = data.current_index;
        let catalog = TrackCatalog::from_data(
            data,
            SearchEngine::with_min_score(settings.search_min_score),
        );

        let mut session = PlaybackSession::from_preferences(&prefs);
        session.current_index = usize::try_from(stored_index)
            .ok()
            .filter(|idx| *idx < catalog.len());
        if stored_index >= 0 && session.current_index.is_none() {
            warn!(stored_index, len = catalog.len(), "stored index out of range, ignoring");
        }

        surface.set_volume(session.volume);
        surface.set_playback_rate(session.playback_rate);

        info!(
            tracks = catalog.len(),
            favorites = catalog.favorites().len(),
            current = session.current_index_raw(),
            "playlist restored"
        );

        Self {
            catalog,
            navigator: QueueNavigator::new(),
            session,
            stats,
            current_track: None,
            surface,
            persistence,
            clock: Box::new(SystemClock),
            settings,
            subscribers: Vec::new(),
            active_load: None,
            next_token: 0,
            failure_streak: 0,
            pending_advance: None,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Receives every [`PlayerEvent`] published from now on.
    pub fn subscribe(&mut self) -> PlayerEventReceiver {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    // ── Read access ───────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> PlayerSnapshot {
        let current_track = self.current_track().cloned();
        let is_favorite = current_track
            .as_ref()
            .is_some_and(|t| self.catalog.is_favorite(&t.id));

        PlayerSnapshot {
            session: self.session.clone(),
            current_track,
            is_favorite,
            catalog_len: self.catalog.len(),
            stats: self.stats,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// The loaded track, or the selected one when nothing is loaded.
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref().or_else(|| {
            self.session
                .current_index
                .and_then(|idx| self.catalog.get(idx))
        })
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Replaces whatever is loaded with `track` and starts playing it once ready.
    ///
    /// Any earlier load is invalidated. A resolve or load failure leaves the
    /// controller paused and schedules an automatic skip.
    pub fn load_track(&mut self, track: Track) -> Result<(), PlayerError> {
        self.cancel_load();
        self.pending_advance = None;

        self.next_token += 1;
        let token = LoadToken(self.next_token);
        self.active_load = Some(ActiveLoad {
            token,
            started_at: self.clock.now(),
            ready: false,
            autoplay: true,
            pending_seek: None,
        });

        self.session.current_time = 0.0;
        self.session.duration = track.duration_seconds;
        self.current_track = Some(track.clone());
        self.set_transport(TransportState::Loading);
        self.publish(PlayerEvent::TrackChanged {
            index: self.session.current_index,
            track: Some(track.clone()),
        });
        self.publish_position();

        let result = match resolve_source(&track) {
            Ok(source) => {
                debug!(token = token.0, source = %source, "loading");
                self.surface.load(token, &source).map_err(PlayerError::from)
            }
            Err(e) => Err(e),
        };

        if let Err(error) = result {
            self.fail_load(error.clone());
            return Err(error);
        }
        Ok(())
    }

    /// Selects the track at `index`, counts the play and loads it.
    pub fn play_index(&mut self, index: usize) -> Result<(), PlayerError> {
        self.reset_failures();
        self.activate(index)
    }

    pub fn play_album(&mut self, album: &str) -> Result<bool, PlayerError> {
        match self.catalog.first_index_of_album(album) {
            Some(index) => self.play_index(index).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn play_artist(&mut self, artist: &str) -> Result<bool, PlayerError> {
        match self.catalog.first_index_of_artist(artist) {
            Some(index) => self.play_index(index).map(|_| true),
            None => Ok(false),
        }
    }

    fn activate(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.catalog.len();
        let track = self
            .catalog
            .record_play(index)
            .cloned()
            .ok_or(PlayerError::InvalidIndex { index, len })?;

        self.session.current_index = Some(index);
        self.persist_playlist();

        info!(index, title = %track.title, artist = %track.artist, "track selected");
        self.load_track(track)
    }

    fn cancel_load(&mut self) {
        if let Some(load) = self.active_load.take() {
            debug!(token = load.token.0, "dropping previous load");
            self.surface.unload();
        }
    }

    // ── Transport ─────────────────────────────────────────────────────────────

    /// Starts or resumes playback.
    ///
    /// With nothing loaded, the selected track (or the first one) is loaded.
    pub fn play(&mut self) -> Result<(), PlayerError> {
        match self.session.transport {
            TransportState::Playing => Ok(()),
            TransportState::Loading => {
                if let Some(load) = self.active_load.as_mut() {
                    load.autoplay = true;
                }
                Ok(())
            }
            TransportState::Idle | TransportState::Paused | TransportState::Ended => {
                match self.active_load.as_mut() {
                    None => {
                        if self.catalog.is_empty() {
                            return Err(PlayerError::EmptyCatalog);
                        }
                        let index = self
                            .session
                            .current_index
                            .filter(|idx| *idx < self.catalog.len())
                            .unwrap_or(0);
                        self.activate(index)
                    }
                    Some(load) if !load.ready => {
                        load.autoplay = true;
                        load.started_at = self.clock.now();
                        self.set_transport(TransportState::Loading);
                        Ok(())
                    }
                    Some(_) => self.start_output(),
                }
            }
        }
    }

    /// Pauses output. No-op when nothing is loaded.
    pub fn pause(&mut self) {
        match self.session.transport {
            TransportState::Idle | TransportState::Paused => {}
            TransportState::Loading => {
                if let Some(load) = self.active_load.as_mut() {
                    load.autoplay = false;
                }
                self.set_transport(TransportState::Paused);
            }
            TransportState::Playing | TransportState::Ended => {
                self.surface.pause();
                self.set_transport(TransportState::Paused);
            }
        }
    }

    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        match self.session.transport {
            TransportState::Playing | TransportState::Loading => {
                self.pause();
                Ok(())
            }
            _ => self.play(),
        }
    }

    fn start_output(&mut self) -> Result<(), PlayerError> {
        match self.surface.play() {
            Ok(()) => {
                self.reset_failures();
                self.set_transport(TransportState::Playing);
                Ok(())
            }
            Err(SurfaceError::NotAllowed(reason)) => {
                let error = PlayerError::PlaybackNotAllowed(reason);
                warn!(kind = %error.kind(), "{}", error);
                if let Some(load) = self.active_load.as_mut() {
                    load.autoplay = false;
                }
                self.set_transport(TransportState::Paused);
                self.publish(PlayerEvent::Failure {
                    error: error.clone(),
                });
                Err(error)
            }
            Err(other) => {
                let error = PlayerError::from(other);
                self.fail_load(error.clone());
                Err(error)
            }
        }
    }

    /// Moves the position by `delta` seconds.
    pub fn seek(&mut self, delta: f64) {
        self.seek_to(self.session.current_time + delta);
    }

    /// Jumps to `target` seconds, clamped to `[0, duration]`.
    ///
    /// While the duration is unknown only the lower bound applies.
    pub fn seek_to(&mut self, target: f64) {
        if !target.is_finite() {
            return;
        }
        let target = self.clamp_time(target);

        let Some(load) = self.active_load.as_mut() else {
            debug!("seek ignored, nothing loaded");
            return;
        };
        if load.ready {
            self.surface.seek(target);
        } else {
            load.pending_seek = Some(target);
        }

        self.session.current_time = target;
        self.publish_position();
    }

    pub fn seek_forward(&mut self) {
        self.seek(self.settings.seek_step);
    }

    pub fn seek_backward(&mut self) {
        self.seek(-self.settings.seek_step);
    }

    fn clamp_time(&self, target: f64) -> f64 {
        let target = target.max(0.0);
        if self.session.duration > 0.0 {
            target.min(self.session.duration)
        } else {
            target
        }
    }

    // ── Output settings ───────────────────────────────────────────────────────

    /// Sets the volume, clamped to `[0, 1]`. Muted iff the result is 0.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);

        self.session.volume = volume;
        self.session.is_muted = volume == 0.0;
        self.surface.set_volume(volume);
        self.persistence.save_volume(volume);
        self.publish(PlayerEvent::VolumeChanged {
            volume,
            muted: self.session.is_muted,
        });
    }

    pub fn toggle_mute(&mut self) {
        if self.session.is_muted {
            self.set_volume(self.session.pre_mute_volume);
        } else {
            self.session.pre_mute_volume = self.session.volume;
            self.set_volume(0.0);
        }
    }

    /// Non-positive or non-finite rates are ignored.
    pub fn set_playback_rate(&mut self, rate: f32) {
        if !rate.is_finite() || rate <= 0.0 {
            warn!(rate, "ignoring invalid playback rate");
            return;
        }

        self.session.playback_rate = rate;
        self.surface.set_playback_rate(rate);
        self.persistence.save_rate(rate);
        self.publish(PlayerEvent::RateChanged { rate });
    }

    pub fn toggle_repeat_mode(&mut self) -> RepeatMode {
        let mode = self.session.repeat_mode.cycle();
        self.set_repeat_mode(mode);
        mode
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.session.repeat_mode = mode;
        self.persistence.save_repeat(mode);
        self.publish(PlayerEvent::RepeatChanged { mode });
    }

    /// Flips shuffle; the current selection is left alone.
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.session.shuffle_enabled;
        self.set_shuffle(enabled);
        enabled
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.session.shuffle_enabled = enabled;
        self.persistence.save_shuffle(enabled);
        self.publish(PlayerEvent::ShuffleChanged { enabled });
    }

    // ── Navigation ────────────────────────────────────────────────────────────

    /// User-requested next/previous.
    ///
    /// Returns `Ok(false)` when there is nothing in that direction.
    pub fn advance(&mut self, direction: Direction) -> Result<bool, PlayerError> {
        self.reset_failures();
        self.step(direction)
    }

    fn step(&mut self, direction: Direction) -> Result<bool, PlayerError> {
        if self.catalog.is_empty() {
            return Err(PlayerError::EmptyCatalog);
        }

        let target = self
            .navigator
            .step(
                direction,
                &self.catalog,
                self.session.current_index,
                self.session.shuffle_enabled,
            )
            .map(|t| t.index);

        match target {
            Some(index) => self.activate(index).map(|_| true),
            None => {
                debug!(?direction, "no track in that direction");
                Ok(false)
            }
        }
    }

    fn reset_failures(&mut self) {
        self.failure_streak = 0;
        self.pending_advance = None;
    }

    // ── Media events ──────────────────────────────────────────────────────────

    /// Applies an event from the media surface, ignoring stale ones.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        let active = self.active_load.as_ref().map(|l| l.token);
        if active != Some(event.token()) {
            debug!(token = event.token().0, "dropping stale media event");
            return;
        }

        match event {
            MediaEvent::LoadedMetadata { duration, .. } => self.on_loaded_metadata(duration),
            MediaEvent::TimeUpdate { position, .. } => self.on_time_update(position),
            MediaEvent::Ended { .. } => self.on_track_ended(),
            MediaEvent::Error { reason, .. } => self.on_media_error(reason),
        }
    }

    fn on_loaded_metadata(&mut self, duration: f64) {
        let Some(load) = self.active_load.as_mut() else {
            return;
        };
        load.ready = true;
        let autoplay = load.autoplay;
        let pending_seek = load.pending_seek.take();

        let duration = sanitize_seconds(duration);
        if duration > 0.0 {
            self.session.duration = duration;
        }
        debug!(duration = self.session.duration, "metadata loaded");

        if let Some(target) = pending_seek {
            let target = self.clamp_time(target);
            self.surface.seek(target);
            self.session.current_time = target;
        }
        self.publish_position();

        if autoplay && self.session.transport == TransportState::Loading {
            if let Err(e) = self.start_output() {
                debug!(error = %e, "autoplay after load failed");
            }
        }
    }

    fn on_time_update(&mut self, position: f64) {
        let position = sanitize_seconds(position);
        self.session.current_time = if self.session.duration > 0.0 {
            position.min(self.session.duration)
        } else {
            position
        };
        self.publish_position();
    }

    /// Natural end of the current track: update stats, then branch on repeat mode.
    pub fn on_track_ended(&mut self) {
        self.set_transport(TransportState::Ended);

        let listened = if self.session.duration > 0.0 {
            self.session.duration
        } else {
            self.current_track
                .as_ref()
                .map(|t| t.duration_seconds)
                .unwrap_or(0.0)
        };
        self.stats.record_completion(listened);
        self.persistence.save_stats(&self.stats);

        match self.session.repeat_mode {
            RepeatMode::One => {
                debug!("repeating current track");
                self.seek_to(0.0);
                if let Err(e) = self.play() {
                    debug!(error = %e, "restart after end failed");
                }
            }
            RepeatMode::All => match self.step(Direction::Next) {
                Ok(true) => {}
                Ok(false) | Err(PlayerError::EmptyCatalog) => self.go_idle(),
                Err(e) => debug!(error = %e, "continuing after end failed"),
            },
            RepeatMode::Off => {
                self.surface.pause();
                self.seek_to(0.0);
                self.session.current_time = 0.0;
                self.set_transport(TransportState::Paused);
            }
        }
    }

    /// The surface failed to load or decode the current track.
    pub fn on_media_error(&mut self, reason: String) {
        self.fail_load(PlayerError::MediaDecode(reason));
    }

    fn fail_load(&mut self, error: PlayerError) {
        warn!(kind = %error.kind(), "{}", error);
        self.cancel_load();
        self.set_transport(TransportState::Paused);
        self.publish(PlayerEvent::Failure {
            error: error.clone(),
        });
        if error.is_load_failure() {
            self.schedule_auto_advance();
        }
    }

    fn schedule_auto_advance(&mut self) {
        self.failure_streak += 1;
        if self.failure_streak > self.settings.max_auto_advance {
            warn!(
                failures = self.failure_streak,
                "too many consecutive failures, not skipping further"
            );
            self.pending_advance = None;
            return;
        }

        self.pending_advance = Some(self.clock.now() + self.settings.error_advance_delay);
        info!(attempt = self.failure_streak, "skipping to next track shortly");
        self.publish(PlayerEvent::AutoAdvanceScheduled {
            attempt: self.failure_streak,
        });
    }

    /// Drives time-based work: surface polling, load timeout, scheduled skips.
    pub fn tick(&mut self) {
        self.surface.poll();
        let now = self.clock.now();

        // A load the user paused waits indefinitely.
        let timed_out = self.session.transport == TransportState::Loading
            && self.active_load.as_ref().is_some_and(|load| {
                !load.ready && now.duration_since(load.started_at) >= self.settings.load_timeout
            });
        if timed_out {
            self.fail_load(PlayerError::LoadTimedOut(self.settings.load_timeout));
        }

        if self.pending_advance.is_some_and(|due| now >= due) {
            self.pending_advance = None;
            if let Err(e) = self.step(Direction::Next) {
                debug!(error = %e, "auto-advance failed");
            }
        }
    }

    fn go_idle(&mut self) {
        self.cancel_load();
        self.current_track = None;
        self.session.current_time = 0.0;
        self.session.duration = 0.0;
        self.set_transport(TransportState::Idle);
        self.publish(PlayerEvent::TrackChanged {
            index: self.session.current_index,
            track: None,
        });
    }

    // ── Catalog ───────────────────────────────────────────────────────────────

    pub fn add_track(&mut self, input: TrackInput, source_kind: SourceKind) -> Track {
        let track = self.catalog.add_track(input, source_kind);
        self.catalog_changed();
        track
    }

    /// Adds every input in order; returns the created tracks.
    pub fn import_tracks(
        &mut self,
        inputs: impl IntoIterator<Item = TrackInput>,
        source_kind: SourceKind,
    ) -> Vec<Track> {
        let added: Vec<Track> = inputs
            .into_iter()
            .map(|input| self.catalog.add_track(input, source_kind))
            .collect();
        if !added.is_empty() {
            info!(count = added.len(), source = source_kind.as_str(), "tracks imported");
            self.catalog_changed();
        }
        added
    }

    /// Removes a track, keeping the selection on the same logical track.
    ///
    /// Removing the selected track stops playback; the selection then points at
    /// the track that slid into its slot, or the new last track.
    pub fn remove_track(&mut self, id: &str) -> Option<Track> {
        let (removed_index, track) = self.catalog.remove_track(id)?;
        let len = self.catalog.len();

        match self.session.current_index {
            Some(current) if removed_index < current => {
                self.session.current_index = Some(current - 1);
            }
            Some(current) if removed_index == current => {
                self.session.current_index = (len > 0).then(|| current.min(len - 1));
                self.reset_failures();
                self.go_idle();
            }
            _ => {}
        }

        self.catalog_changed();
        Some(track)
    }

    /// Removes every track and stops playback.
    pub fn clear_playlist(&mut self) -> usize {
        let removed = self.catalog.clear();
        self.session.current_index = None;
        self.go_idle();
        self.reset_failures();
        self.catalog_changed();
        info!(removed, "playlist cleared");
        removed
    }

    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let favorite = self.catalog.toggle_favorite(id);
        self.persist_playlist();
        self.publish(PlayerEvent::FavoriteChanged {
            id: id.to_string(),
            favorite,
        });
        favorite
    }

    /// Toggles the favorite flag of the current track, if any.
    pub fn toggle_current_favorite(&mut self) -> Option<bool> {
        let id = self.current_track()?.id.clone();
        Some(self.toggle_favorite(&id))
    }

    fn catalog_changed(&mut self) {
        self.persist_playlist();
        self.publish(PlayerEvent::CatalogChanged {
            len: self.catalog.len(),
        });
    }

    // ── Persistence & events ──────────────────────────────────────────────────

    fn persist_playlist(&mut self) {
        let data = self.catalog.to_data(self.session.current_index);
        self.persistence.save_playlist(&data);
    }

    /// Writes everything the controller persists.
    pub fn flush(&mut self) {
        self.persist_playlist();
        let prefs = self.session.preferences();
        self.persistence.save_preferences(&prefs);
        self.persistence.save_stats(&self.stats);
    }

    fn set_transport(&mut self, state: TransportState) {
        if self.session.transport != state {
            debug!(from = ?self.session.transport, to = ?state, "transport");
            self.session.transport = state;
            self.publish(PlayerEvent::TransportChanged { state });
        }
    }

    fn publish_position(&mut self) {
        self.publish(PlayerEvent::PositionChanged {
            current: self.session.current_time,
            duration: self.session.duration,
        });
    }

    fn publish(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Turns a track's stored location into something the surface can load.
///
/// Online tracks need an http(s) URL, local tracks are file paths and
/// imported tracks may be either.
pub fn resolve_source(track: &Track) -> Result<SourceDescriptor, PlayerError> {
    let location = track
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| {
            PlayerError::TrackUnresolvable(format!("'{}' has no source", track.title))
        })?;

    match track.source_kind {
        SourceKind::Online => parse_remote(location).ok_or_else(|| {
            PlayerError::TrackUnresolvable(format!("invalid URL '{}'", location))
        }),
        SourceKind::Local => Ok(SourceDescriptor::File(PathBuf::from(location))),
        SourceKind::Imported => Ok(parse_remote(location)
            .unwrap_or_else(|| SourceDescriptor::File(PathBuf::from(location)))),
    }
}

fn parse_remote(location: &str) -> Option<SourceDescriptor> {
    let url = Url::parse(location).ok()?;
    match url.scheme() {
        "http" | "https" => Some(SourceDescriptor::Remote(url)),
        "file" => url.to_file_path().ok().map(SourceDescriptor::File),
        _ => None,
    }
}
