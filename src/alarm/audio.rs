//! Audio Alerter
//!
//! Synthesizes the alarm beep and repeats it while an alarm is ringing.
//!
//! ## Pattern
//!
//! Three bursts at 0.0 s, 0.3 s and 0.6 s lasting 0.2 s, 0.2 s and 0.4 s.
//! Each burst mixes an 880 Hz and a 1047 Hz sine under a short linear attack
//! followed by an exponential decay. The pattern repeats every beep interval
//! (3 s by default) until [`AudioAlerter::stop`] is called.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;

/// Frequencies played together in every burst
pub const TONE_FREQUENCIES: [f32; 2] = [880.0, 1047.0];

/// Errors from an audio output
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio device error: {0}")]
    Device(String),
}

/// One tone burst inside the pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneBurst {
    pub offset_secs: f32,
    pub duration_secs: f32,
}

/// The repeating beep pattern
#[derive(Debug, Clone)]
pub struct BeepPattern {
    pub bursts: Vec<ToneBurst>,
    pub frequencies: [f32; 2],
    /// Gain of each oscillator at the end of the attack
    pub peak_gain: f32,
    pub attack_secs: f32,
    /// Gain the decay reaches at the end of a burst
    pub floor_gain: f32,
}

impl BeepPattern {
    pub fn standard() -> Self {
        Self {
            bursts: vec![
                ToneBurst {
                    offset_secs: 0.0,
                    duration_secs: 0.2,
                },
                ToneBurst {
                    offset_secs: 0.3,
                    duration_secs: 0.2,
                },
                ToneBurst {
                    offset_secs: 0.6,
                    duration_secs: 0.4,
                },
            ],
            frequencies: TONE_FREQUENCIES,
            peak_gain: 0.3,
            attack_secs: 0.01,
            floor_gain: 0.001,
        }
    }

    /// Length of the pattern from the first burst start to the last burst end
    pub fn length_secs(&self) -> f32 {
        self.bursts
            .iter()
            .map(|b| b.offset_secs + b.duration_secs)
            .fold(0.0, f32::max)
    }

    /// Envelope gain `t` seconds into a burst of length `duration`
    pub fn envelope(&self, t: f32, duration: f32) -> f32 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }
        if t < self.attack_secs {
            return self.peak_gain * t / self.attack_secs;
        }

        let decay_len = (duration - self.attack_secs).max(f32::EPSILON);
        let progress = (t - self.attack_secs) / decay_len;
        self.peak_gain * (self.floor_gain / self.peak_gain).powf(progress)
    }

    /// Render the whole pattern to mono PCM samples in [-1, 1]
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let total = (self.length_secs() * rate).ceil() as usize;
        let mut samples = vec![0.0f32; total];

        for burst in &self.bursts {
            let start = (burst.offset_secs * rate).round() as usize;
            let len = (burst.duration_secs * rate).round() as usize;

            for i in 0..len {
                let idx = start + i;
                if idx >= total {
                    break;
                }
                let t = i as f32 / rate;
                let gain = self.envelope(t, burst.duration_secs);
                let tone: f32 = self
                    .frequencies
                    .iter()
                    .map(|f| (2.0 * std::f32::consts::PI * f * t).sin())
                    .sum();
                samples[idx] += gain * tone;
            }
        }

        for s in samples.iter_mut() {
            *s = s.clamp(-1.0, 1.0);
        }
        samples
    }
}

impl Default for BeepPattern {
    fn default() -> Self {
        Self::standard()
    }
}

/// Sink for rendered samples
pub trait AudioOutput: Send + Sync {
    fn play(&self, samples: &[f32], sample_rate: u32) -> Result<(), AudioError>;
}

/// Rings the terminal bell once per pattern
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioOutput for TerminalBell {
    fn play(&self, _samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
        use std::io::Write;
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// Discards samples
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&self, _samples: &[f32], _sample_rate: u32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Rendered pattern bound to an output. Built once and reused.
pub struct AudioContext {
    sample_rate: u32,
    samples: Vec<f32>,
    output: Arc<dyn AudioOutput>,
}

impl AudioContext {
    pub fn new(pattern: &BeepPattern, sample_rate: u32, output: Arc<dyn AudioOutput>) -> Self {
        tracing::debug!(sample_rate, "Creating audio context");
        Self {
            sample_rate,
            samples: pattern.render(sample_rate),
            output,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn play_pattern(&self) -> Result<(), AudioError> {
        self.output.play(&self.samples, self.sample_rate)
    }
}

type ContextFactory = Box<dyn Fn() -> AudioContext + Send + Sync>;

struct AlerterInner {
    playing: AtomicBool,
    context: OnceLock<Arc<AudioContext>>,
    factory: ContextFactory,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Repeats the beep pattern while an alarm is active.
///
/// Cloning shares the same playing flag and audio context.
#[derive(Clone)]
pub struct AudioAlerter {
    inner: Arc<AlerterInner>,
}

impl AudioAlerter {
    /// Alerter whose audio context is built by `factory` on first start
    pub fn new<F>(interval: Duration, factory: F) -> Self
    where
        F: Fn() -> AudioContext + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(AlerterInner {
                playing: AtomicBool::new(false),
                context: OnceLock::new(),
                factory: Box::new(factory),
                interval,
                task: Mutex::new(None),
            }),
        }
    }

    /// Alerter playing the standard pattern into `output`
    pub fn with_output(interval: Duration, sample_rate: u32, output: Arc<dyn AudioOutput>) -> Self {
        Self::new(interval, move || {
            AudioContext::new(&BeepPattern::standard(), sample_rate, Arc::clone(&output))
        })
    }

    pub fn is_playing(&self) -> bool {
        self.inner.playing.load(Ordering::SeqCst)
    }

    /// Start repeating the pattern. Returns `false` if already playing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        if self.inner.playing.swap(true, Ordering::SeqCst) {
            return false;
        }

        let context = Arc::clone(
            self.inner
                .context
                .get_or_init(|| Arc::new((self.inner.factory)())),
        );
        let inner = Arc::clone(&self.inner);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(inner.interval);
            loop {
                ticker.tick().await;
                if !inner.playing.load(Ordering::SeqCst) {
                    break;
                }
                if let Err(e) = context.play_pattern() {
                    tracing::warn!(error = %e, "Failed to play alarm tone");
                }
            }
        });

        if let Ok(mut task) = self.inner.task.lock() {
            if let Some(old) = task.replace(handle) {
                old.abort();
            }
        }

        tracing::info!("Alarm sound started");
        true
    }

    /// Stop playback; no further patterns are played after this returns
    pub fn stop(&self) {
        let was_playing = self.inner.playing.swap(false, Ordering::SeqCst);

        if let Ok(mut task) = self.inner.task.lock() {
            if let Some(handle) = task.take() {
                handle.abort();
            }
        }

        if was_playing {
            tracing::info!("Alarm sound stopped");
        }
    }
}

impl std::fmt::Debug for AudioAlerter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioAlerter")
            .field("playing", &self.is_playing())
            .field("interval", &self.inner.interval)
            .finish()
    }
}
