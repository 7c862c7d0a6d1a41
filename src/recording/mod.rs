//! Recording lifecycle orchestration
//!
//! The controller owns the state machine and all recording handles:
//! - device selection and stream acquisition
//! - the capture loop (read, process, append to the WAV writer)
//! - the finalize sequence (release hardware, patch header, encrypt, update
//!   the session row, enqueue transcription)
//! - cooperative cancellation with drain-and-join stop semantics

mod controller;
mod state;

pub use controller::{RecorderConfig, RecordingController};
pub use state::RecorderState;
