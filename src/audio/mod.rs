mod buffer;
pub mod wav;

pub use buffer::{resample, stretch_to_len, AudioBuffer, WHISPER_SAMPLE_RATE};
pub use wav::{encode_wav, read_wav, write_wav};
