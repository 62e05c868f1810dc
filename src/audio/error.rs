use thiserror::Error;

/// Errors that can occur while opening or feeding the audio output
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No output device found")]
    NoOutputDevice,

    #[error("Failed to get default output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("Failed to spawn audio thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Audio thread exited before the stream opened")]
    BackendGone,

    #[error("Voice queue is full")]
    VoiceQueueFull,
}
