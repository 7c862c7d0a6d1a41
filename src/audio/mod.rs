pub mod device;
pub mod input;
pub mod pipeline;
pub mod wav;

pub use device::{select_preferred_input, AudioDevice, AudioDeviceType};
pub use input::{AudioHost, AudioInput, SineHost, SineInput, StreamProfile};
pub use pipeline::AudioPipeline;
pub use wav::{WavFileWriter, WavMetadata};
