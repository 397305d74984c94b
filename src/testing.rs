//! Fakes shared by unit tests across modules.

use crate::core::error::SurfaceError;
use crate::core::events::LoadToken;
use crate::core::models::TrackInput;
use crate::core::traits::{Clock, KeyValueStore, MediaSurface, SourceDescriptor};
use anyhow::{Result, anyhow};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Track input with a title and a playable URL derived from it.
pub fn input(title: &str) -> TrackInput {
    TrackInput {
        url: Some(format!(
            "https://example.com/{}.mp3",
            title.to_lowercase().replace(' ', "-")
        )),
        ..TrackInput::titled(title)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Load(LoadToken, SourceDescriptor),
    Play,
    Pause,
    Seek(f64),
    Volume(f32),
    Rate(f32),
    Unload,
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub calls: Vec<SurfaceCall>,
    /// Returned by the next `play` calls, front first
    pub play_failures: Vec<SurfaceError>,
    /// Returned by the next `load` calls, front first
    pub load_failures: Vec<SurfaceError>,
}

impl SurfaceLog {
    pub fn tokens(&self) -> Vec<LoadToken> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SurfaceCall::Load(token, _) => Some(*token),
                _ => None,
            })
            .collect()
    }

    pub fn last_token(&self) -> Option<LoadToken> {
        self.tokens().last().copied()
    }

    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

/// Media surface that records every command and completes nothing by itself.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MediaSurface for RecordingSurface {
    fn load(&mut self, token: LoadToken, source: &SourceDescriptor) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(SurfaceCall::Load(token, source.clone()));
        if log.load_failures.is_empty() {
            Ok(())
        } else {
            Err(log.load_failures.remove(0))
        }
    }

    fn play(&mut self) -> Result<(), SurfaceError> {
        let mut log = self.log.borrow_mut();
        log.calls.push(SurfaceCall::Play);
        if log.play_failures.is_empty() {
            Ok(())
        } else {
            Err(log.play_failures.remove(0))
        }
    }

    fn pause(&mut self) {
        self.log.borrow_mut().calls.push(SurfaceCall::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.log.borrow_mut().calls.push(SurfaceCall::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().calls.push(SurfaceCall::Volume(volume));
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.log.borrow_mut().calls.push(SurfaceCall::Rate(rate));
    }

    fn unload(&mut self) {
        self.log.borrow_mut().calls.push(SurfaceCall::Unload);
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// In-memory store whose contents stay visible to the test after it is boxed.
#[derive(Clone, Default)]
pub struct SharedStore {
    pub entries: Rc<RefCell<HashMap<String, String>>>,
}

impl SharedStore {
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store where every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("disk on fire"))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
}
