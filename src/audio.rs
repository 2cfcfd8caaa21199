use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use crate::error::GameError;

// ── Clips ───────────────────────────────────────────────────────────────────

const SAMPLE_RATE: u32 = 44_100;

/// A mono sound effect rendered ahead of time.
#[derive(Clone, Debug)]
pub struct SoundClip {
    name: &'static str,
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl SoundClip {
    pub fn new(name: &'static str, sample_rate: u32, samples: Vec<f32>) -> Self {
        Self {
            name,
            sample_rate,
            samples: samples.into(),
        }
    }

    /// Short bright blip played when a pipe is passed.
    pub fn point() -> Self {
        let mut samples = Vec::new();
        render_into(&mut samples, Box::new(sine_hz::<f32>(880.0) * 0.15), 0.06);
        render_into(&mut samples, Box::new(sine_hz::<f32>(1320.0) * 0.15), 0.08);
        fade_out(&mut samples);
        Self::new("point", SAMPLE_RATE, samples)
    }

    /// Falling sawtooth played when the bird dies.
    pub fn game_over() -> Self {
        let mut samples = Vec::new();
        for (freq, secs) in [(400.0, 0.1), (280.0, 0.1), (180.0, 0.1), (90.0, 0.2)] {
            render_into(&mut samples, Box::new(saw_hz(freq) * 0.15), secs);
        }
        fade_out(&mut samples);
        Self::new("game_over", SAMPLE_RATE, samples)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

fn render_into(out: &mut Vec<f32>, mut node: Box<dyn AudioUnit>, seconds: f64) {
    node.set_sample_rate(SAMPLE_RATE as f64);
    let count = (SAMPLE_RATE as f64 * seconds) as usize;
    out.extend((0..count).map(|_| node.get_mono()));
}

fn fade_out(samples: &mut [f32]) {
    let len = Ord::max(samples.len(), 1) as f32;
    for (i, s) in samples.iter_mut().enumerate() {
        *s *= 1.0 - i as f32 / len;
    }
}

/// Clips the score keeper may play. Either slot can be left empty.
#[derive(Clone, Debug, Default)]
pub struct SoundBank {
    pub point: Option<SoundClip>,
    pub game_over: Option<SoundClip>,
}

impl SoundBank {
    pub fn synthesized() -> Self {
        Self {
            point: Some(SoundClip::point()),
            game_over: Some(SoundClip::game_over()),
        }
    }
}

// ── Outputs ─────────────────────────────────────────────────────────────────

pub trait AudioOutput {
    fn play(&mut self, clip: &SoundClip);
}

/// Plays clips on the default output device.
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn open() -> Result<Self, GameError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| GameError::Audio(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, clip: &SoundClip) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(
                    1,
                    clip.sample_rate,
                    clip.samples.to_vec(),
                ));
                sink.detach(); // Play in background
            }
            Err(e) => tracing::warn!(clip = clip.name, "Failed to open sink: {e}"),
        }
    }
}

/// Discards everything. Used when muted or when no device exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, _clip: &SoundClip) {}
}

/// Remembers the name of every clip played. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingOutput {
    played: Rc<RefCell<Vec<&'static str>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<&'static str> {
        self.played.borrow().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.played.borrow().iter().filter(|n| **n == name).count()
    }
}

impl AudioOutput for RecordingOutput {
    fn play(&mut self, clip: &SoundClip) {
        self.played.borrow_mut().push(clip.name);
    }
}

/// Output handle plus the clip currently assigned to it.
pub struct AudioSource {
    output: Box<dyn AudioOutput>,
    clip: Option<SoundClip>,
}

impl AudioSource {
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self { output, clip: None }
    }

    pub fn set_clip(&mut self, clip: SoundClip) {
        self.clip = Some(clip);
    }

    /// Plays the assigned clip. Returns false when nothing is assigned.
    pub fn play(&mut self) -> bool {
        match &self.clip {
            Some(clip) => {
                self.output.play(clip);
                true
            }
            None => false,
        }
    }
}
