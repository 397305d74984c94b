use crate::core::error::SurfaceError;
use crate::core::events::LoadToken;
use crate::core::traits::{MediaSurface, SourceDescriptor};

/// Surface with no audio device, for commands that only edit the library
/// or preferences. Loads never complete.
#[derive(Debug, Default)]
pub struct SilentSurface;

impl MediaSurface for SilentSurface {
    fn load(&mut self, _token: LoadToken, _source: &SourceDescriptor) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn play(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn seek(&mut self, _seconds: f64) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn set_playback_rate(&mut self, _rate: f32) {}
}
