pub mod audio;
pub mod augmentation;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod evaluation;
pub mod global;
pub mod normalizer;
pub mod transcription;
pub mod wer;
