//! Sound cues and the players that voice them
//!
//! The simulation only queues [`Cue`]s. A [`CueSink`] turns them into sound,
//! and a sink with no working backend simply drops them.

#[cfg(not(target_arch = "wasm32"))]
use crate::settings::Settings;

/// Named sound events raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Ball hits a paddle
    PaddleHit,
    /// Ball hits the top or bottom wall
    WallBounce,
    /// A point was scored and the ball re-served
    Score,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::PaddleHit => "paddle_hit",
            Cue::WallBounce => "wall_bounce",
            Cue::Score => "score",
        }
    }
}

/// Anything that can play cues. Playing never fails.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Collects cues instead of playing them
impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Sink for platforms without an audio backend
#[derive(Debug, Default)]
pub struct SilentAudio;

impl CueSink for SilentAudio {
    fn play(&mut self, cue: Cue) {
        log::trace!("cue {} (audio disabled)", cue.name());
    }
}

/// Oscillator waveform for a tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Square,
    Triangle,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub wave: Wave,
    /// Peak gain before master/sfx volume
    pub gain: f32,
    /// Seconds after the cue fires
    pub delay: f64,
    /// Seconds until the note stops
    pub duration: f64,
}

impl Cue {
    /// Notes that voice this cue
    pub fn tones(&self) -> &'static [Tone] {
        const PADDLE_HIT: [Tone; 1] = [Tone {
            freq: 440.0,
            wave: Wave::Square,
            gain: 0.3,
            delay: 0.0,
            duration: 0.1,
        }];
        const WALL_BOUNCE: [Tone; 1] = [Tone {
            freq: 220.0,
            wave: Wave::Square,
            gain: 0.2,
            delay: 0.0,
            duration: 0.08,
        }];
        // Falling two-note tone
        const SCORE: [Tone; 2] = [
            Tone {
                freq: 523.0,
                wave: Wave::Triangle,
                gain: 0.3,
                delay: 0.0,
                duration: 0.25,
            },
            Tone {
                freq: 392.0,
                wave: Wave::Triangle,
                gain: 0.3,
                delay: 0.12,
                duration: 0.25,
            },
        ];

        match self {
            Cue::PaddleHit => &PADDLE_HIT,
            Cue::WallBounce => &WALL_BOUNCE,
            Cue::Score => &SCORE,
        }
    }
}

/// Sample rate for cues rendered in software
pub const SAMPLE_RATE: u32 = 44_100;

/// Level the decay envelope reaches at 80% of a note
const DECAY_FLOOR: f32 = 0.01;

impl Wave {
    /// One cycle sampled at `phase` in `0.0..1.0`, peak 1.0
    fn sample(&self, phase: f32) -> f32 {
        match self {
            Wave::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Wave::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        }
    }
}

impl Tone {
    /// Gain envelope `t` seconds into the note: exponential decay from
    /// `peak` to the floor over 80% of the note, then held
    fn envelope(&self, peak: f32, t: f64) -> f32 {
        let ramp = self.duration * 0.8;
        let progress = (t / ramp).min(1.0) as f32;
        peak * (DECAY_FLOOR / peak).powf(progress)
    }

    /// Mono samples from cue start to the end of this note
    pub fn render(&self, sample_rate: u32, volume: f32) -> Vec<f32> {
        let rate = sample_rate as f64;
        let start = (self.delay * rate).round() as usize;
        let end = ((self.delay + self.duration) * rate).round() as usize;
        let peak = volume * self.gain;

        let mut samples = vec![0.0; end];
        if peak <= 0.0 {
            return samples;
        }
        for (i, out) in samples.iter_mut().enumerate().skip(start) {
            let t = (i - start) as f64 / rate;
            let phase = (t * self.freq as f64).fract() as f32;
            *out = self.wave.sample(phase) * self.envelope(peak, t);
        }
        samples
    }
}

/// Mix every note of `cue` into one mono buffer
pub fn render_cue(cue: Cue, sample_rate: u32, volume: f32) -> Vec<f32> {
    let mut mix: Vec<f32> = Vec::new();
    for tone in cue.tones() {
        let samples = tone.render(sample_rate, volume);
        if samples.len() > mix.len() {
            mix.resize(samples.len(), 0.0);
        }
        for (out, s) in mix.iter_mut().zip(samples) {
            *out += s;
        }
    }
    mix
}

#[cfg(all(not(target_arch = "wasm32"), feature = "native-audio"))]
pub use native::NativeAudio;

#[cfg(all(not(target_arch = "wasm32"), feature = "native-audio"))]
mod native {
    use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

    use super::{Cue, CueSink, SAMPLE_RATE, render_cue};
    use crate::settings::Settings;

    /// Plays cues on the default output device
    pub struct NativeAudio {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
    }

    impl NativeAudio {
        pub fn new(settings: &Settings) -> Result<Self, rodio::StreamError> {
            let (stream, handle) = OutputStream::try_default()?;
            Ok(Self {
                _stream: stream,
                handle,
                volume: settings.effective_volume(),
            })
        }
    }

    impl CueSink for NativeAudio {
        fn play(&mut self, cue: Cue) {
            if self.volume <= 0.0 {
                return;
            }
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let samples = render_cue(cue, SAMPLE_RATE, self.volume);
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                    sink.detach();
                }
                Err(e) => log::debug!("Dropped {} cue: {e}", cue.name()),
            }
        }
    }
}

/// Best available sink for a desktop build
#[cfg(not(target_arch = "wasm32"))]
#[cfg_attr(not(feature = "native-audio"), allow(unused_variables))]
pub fn native_output(settings: &Settings) -> Box<dyn CueSink> {
    #[cfg(feature = "native-audio")]
    match NativeAudio::new(settings) {
        Ok(audio) => return Box::new(audio),
        Err(e) => log::warn!("No audio output, cues will be silent: {e}"),
    }
    #[cfg(not(feature = "native-audio"))]
    log::info!("Built without native-audio, cues will be silent");

    Box::new(SilentAudio)
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    //! Web Audio procedural cues - no sample files needed

    use web_sys::{AudioContext, OscillatorType};

    use super::{Cue, CueSink, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }
    }

    /// Schedule one note; failures just drop the note
    fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(match tone.wave {
            Wave::Square => OscillatorType::Square,
            Wave::Triangle => OscillatorType::Triangle,
        });
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let start = ctx.current_time() + tone.delay;
        let env = gain.gain();
        env.set_value_at_time(vol * tone.gain, start).ok()?;
        env.exponential_ramp_to_value_at_time(0.01, start + tone.duration * 0.8)
            .ok()?;

        osc.start_with_when(start).ok()?;
        osc.stop_with_when(start + tone.duration).ok()
    }

    impl CueSink for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Browsers start the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in cue.tones() {
                if play_tone(ctx, tone, vol).is_none() {
                    log::debug!("Dropped a {} note", cue.name());
                }
            }
        }
    }
}
