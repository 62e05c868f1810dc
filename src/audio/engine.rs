//! Audio engine - cpal-backed output connection
//!
//! The cpal stream is opened and owned by a dedicated thread, because
//! `cpal::Stream` is not `Send` on every platform. The connection handed
//! back to callers only holds the voice queue producer and the means to shut
//! that thread down.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::thread::{self, JoinHandle};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use super::error::AudioError;
use super::mixer::Mixer;
use super::output::{AudioHost, OutputConnection};
use super::tone::Voice;

/// Voices that can wait between two audio callbacks
const VOICE_QUEUE_CAPACITY: usize = 64;

/// Opens connections on the system's default output device
#[derive(Default)]
pub struct CpalHost;

impl CpalHost {
    pub fn new() -> Self {
        Self
    }
}

impl AudioHost for CpalHost {
    type Connection = CpalConnection;

    fn create_output_connection(&self) -> Result<CpalConnection, AudioError> {
        log::info!("Opening audio output...");

        let (voices, pending) = HeapRb::<Voice>::new(VOICE_QUEUE_CAPACITY).split();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let (shutdown_tx, shutdown_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("click-audio".to_string())
            .spawn(move || run_stream(pending, ready_tx, shutdown_rx))?;

        match ready_rx.recv() {
            Ok(Ok(rate)) => log::info!("Audio output opened at {} Hz", rate),
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(AudioError::BackendGone);
            }
        }

        Ok(CpalConnection {
            voices,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }
}

/// Body of the audio thread: open the stream, report, then hold it open
fn run_stream(
    pending: HeapCons<Voice>,
    ready: SyncSender<Result<u32, AudioError>>,
    shutdown: Receiver<()>,
) {
    let stream = match open_stream(pending) {
        Ok((stream, rate)) => {
            let _ = ready.send(Ok(rate));
            stream
        }
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    // Returns once the connection drops its sender
    let _ = shutdown.recv();
    drop(stream);
    log::info!("Audio output closed");
}

/// Build and start a stream on the default output device
fn open_stream(pending: HeapCons<Voice>) -> Result<(cpal::Stream, u32), AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::NoOutputDevice)?;

    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
    log::info!("Using output device: {}", device_name);

    let config = device.default_output_config()?;
    log::info!("Audio config: {:?}", config);

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    let mut mixer = Mixer::new(pending, sample_rate as f32);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| mixer.fill(data, channels),
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?,
        cpal::SampleFormat::I16 => device.build_output_stream(
            &config.into(),
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| mixer.fill(data, channels),
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?,
        cpal::SampleFormat::U16 => device.build_output_stream(
            &config.into(),
            move |data: &mut [u16], _: &cpal::OutputCallbackInfo| mixer.fill(data, channels),
            |err| log::error!("Audio stream error: {}", err),
            None,
        )?,
        format => return Err(AudioError::UnsupportedFormat(format)),
    };

    stream.play()?;
    log::info!("Audio output running at {} Hz, {} channel(s)", sample_rate, channels);
    Ok((stream, sample_rate))
}

/// Connection to the default output device
///
/// Dropping it stops the stream and joins the audio thread.
pub struct CpalConnection {
    voices: HeapProd<Voice>,
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl OutputConnection for CpalConnection {
    fn start(&mut self, voice: Voice) -> Result<(), AudioError> {
        self.voices
            .try_push(voice)
            .map_err(|_| AudioError::VoiceQueueFull)
    }
}

impl Drop for CpalConnection {
    fn drop(&mut self) {
        self.shutdown.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Audio thread panicked");
            }
        }
    }
}
