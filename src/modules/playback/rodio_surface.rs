use crate::core::error::SurfaceError;
use crate::core::events::{LoadToken, MediaEvent, MediaEventSender};
use crate::core::traits::{MediaSurface, SourceDescriptor};
use crate::utils::perceptual_amplitude;
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

struct LoadedSource {
    token: LoadToken,
    path: PathBuf,
    sink: Sink,
    ended_sent: bool,
}

/// Audio output backed by rodio.
///
/// Plays local files only; remote sources are reported as unresolvable.
/// Load completion, position and end of track are sent as [`MediaEvent`]s.
pub struct RodioSurface {
    // Output stops when this is dropped.
    stream: OutputStream,
    loaded: Option<LoadedSource>,
    volume: f32,
    rate: f32,
    events: MediaEventSender,
}

impl RodioSurface {
    pub fn new(events: MediaEventSender) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // Keep the raw-mode status line clean on exit.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            loaded: None,
            volume: 1.0,
            rate: 1.0,
            events,
        })
    }

    fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, SurfaceError> {
        let file = File::open(path).map_err(|e| {
            SurfaceError::Unresolvable(format!("cannot open {}: {}", path.display(), e))
        })?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| SurfaceError::Decode(format!("{}: {}", path.display(), e)))
    }

    /// Re-appends the file when the previous pass has played out.
    fn refill_if_drained(&mut self) -> Result<(), SurfaceError> {
        let Some(loaded) = self.loaded.as_mut() else {
            return Ok(());
        };
        if loaded.sink.empty() {
            let decoder = Self::decode(&loaded.path)?;
            loaded.sink.append(decoder);
            loaded.ended_sent = false;
        }
        Ok(())
    }

    fn send(&self, event: MediaEvent) {
        if self.events.send(event).is_err() {
            debug!("media event receiver dropped");
        }
    }
}

impl MediaSurface for RodioSurface {
    fn load(&mut self, token: LoadToken, source: &SourceDescriptor) -> Result<(), SurfaceError> {
        self.unload();

        let path = match source {
            SourceDescriptor::File(path) => path.clone(),
            SourceDescriptor::Remote(url) => {
                return Err(SurfaceError::Unresolvable(format!(
                    "streaming {} is not supported by the local output",
                    url
                )));
            }
        };

        let decoder = Self::decode(&path)?;
        let duration = decoder
            .total_duration()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.set_volume(perceptual_amplitude(self.volume));
        sink.set_speed(self.rate);
        sink.append(decoder);

        debug!(token = token.0, path = %path.display(), duration, "source ready");
        self.loaded = Some(LoadedSource {
            token,
            path,
            sink,
            ended_sent: false,
        });
        self.send(MediaEvent::LoadedMetadata { token, duration });
        Ok(())
    }

    fn play(&mut self) -> Result<(), SurfaceError> {
        self.refill_if_drained()?;
        match &self.loaded {
            Some(loaded) => {
                loaded.sink.play();
                Ok(())
            }
            None => Err(SurfaceError::Unresolvable("nothing loaded".to_string())),
        }
    }

    fn pause(&mut self) {
        if let Some(loaded) = &self.loaded {
            loaded.sink.pause();
        }
    }

    fn seek(&mut self, seconds: f64) {
        if let Err(e) = self.refill_if_drained() {
            warn!(error = %e, "could not reopen source for seeking");
            return;
        }
        if let Some(loaded) = &self.loaded {
            if let Err(e) = loaded.sink.try_seek(Duration::from_secs_f64(seconds.max(0.0))) {
                warn!(error = %e, seconds, "seek failed");
            }
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(loaded) = &self.loaded {
            loaded.sink.set_volume(perceptual_amplitude(self.volume));
        }
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
        if let Some(loaded) = &self.loaded {
            loaded.sink.set_speed(rate);
        }
    }

    fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            loaded.sink.stop();
        }
    }

    fn poll(&mut self) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        let token = loaded.token;

        if loaded.sink.empty() {
            if !loaded.ended_sent {
                loaded.ended_sent = true;
                self.send(MediaEvent::Ended { token });
            }
        } else if !loaded.sink.is_paused() {
            let position = loaded.sink.get_pos().as_secs_f64();
            self.send(MediaEvent::TimeUpdate { token, position });
        }
    }
}

impl Drop for RodioSurface {
    fn drop(&mut self) {
        self.unload();
    }
}
