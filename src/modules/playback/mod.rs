pub mod controller;
pub mod navigator;
pub mod playback_progress;
pub mod rodio_surface;
pub mod silent_surface;
