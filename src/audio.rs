//! Audio: background music and one-shot effects.
//!
//! `AudioSystem` owns the clip descriptions and the voice bookkeeping; the
//! actual noise is made by an `AudioOutput`.  Clips are decoded with rodio.
//! With the `playback` feature `RodioOutput` plays them on the default
//! device; `TerminalBell` is the fallback when no device can be opened.  A
//! clip that fails to load is simply muted.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use rodio::source::Buffered;
use rodio::{Decoder, Source};

use crate::config::AudioConfig;
use crate::entities::SoundCue;

/// Decoded samples, cheap to clone for each playback.
pub type Sound = Buffered<Decoder<BufReader<File>>>;

/// Where a clip is routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Music,
    Effect(SoundCue),
}

/// Sink for load/start/stop requests.
pub trait AudioOutput {
    /// Decode `path` and keep it ready for `channel`.
    fn load(&mut self, channel: Channel, path: &Path) -> Result<Clip, AssetError>;
    /// Music loops until stopped; effects play once.
    fn start(&mut self, channel: Channel, clip: &Clip, volume: f32);
    fn stop(&mut self, channel: Channel);
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn load(&mut self, channel: Channel, path: &Path) -> Result<Clip, AssetError> {
        (**self).load(channel, path)
    }

    fn start(&mut self, channel: Channel, clip: &Clip, volume: f32) {
        (**self).start(channel, clip, volume)
    }

    fn stop(&mut self, channel: Channel) {
        (**self).stop(channel)
    }
}

/// A loaded sound and its playing time.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    pub name: String,
    /// Seconds; zero when the decoder cannot tell.
    pub duration: f32,
}

#[derive(Debug)]
pub enum AssetError {
    Io(std::io::Error),
    Decode(rodio::decoder::DecoderError),
    /// Decodes, but there is nothing to play.
    Empty,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "cannot decode: {err}"),
            Self::Empty => write!(f, "no audio samples"),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Empty => None,
        }
    }
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rodio::decoder::DecoderError> for AssetError {
    fn from(err: rodio::decoder::DecoderError) -> Self {
        Self::Decode(err)
    }
}

/// Decode a sound file fully into memory.
pub fn decode(path: &Path) -> Result<(Clip, Sound), AssetError> {
    let file = File::open(path)?;
    let sound = Decoder::new(BufReader::new(file))?.buffered();
    if sound.clone().next().is_none() {
        return Err(AssetError::Empty);
    }
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let duration = sound
        .total_duration()
        .map(|d| d.as_secs_f32())
        .unwrap_or(0.0);
    Ok((Clip { name, duration }, sound))
}

pub fn load_clip(path: &Path) -> Result<Clip, AssetError> {
    decode(path).map(|(clip, _)| clip)
}

fn load_or_mute<O: AudioOutput>(output: &mut O, channel: Channel, path: &Path) -> Option<Clip> {
    match output.load(channel, path) {
        Ok(clip) => {
            log::info!("loaded {} ({:.2}s)", path.display(), clip.duration);
            Some(clip)
        }
        Err(err) => {
            log::warn!("audio asset {} unavailable, muting it: {err}", path.display());
            None
        }
    }
}

// ── Voices ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Voice {
    clip: Option<Clip>,
    volume: f32,
    /// Seconds of playback left; zero when idle.
    remaining: f32,
}

impl Voice {
    fn new(clip: Option<Clip>, volume: f32) -> Self {
        Self {
            clip,
            volume,
            remaining: 0.0,
        }
    }

    fn is_playing(&self) -> bool {
        self.remaining > 0.0
    }
}

/// Audio manager for the game
pub struct AudioSystem<O: AudioOutput> {
    output: O,
    music: Option<Clip>,
    music_volume: f32,
    music_on: bool,
    effects: HashMap<SoundCue, Voice>,
}

impl<O: AudioOutput> AudioSystem<O> {
    /// Load every clip named in `config` through `output`.  With `muted`
    /// set nothing is loaded and every request becomes a no-op.
    pub fn new(mut output: O, config: &AudioConfig) -> Self {
        let sources = [
            (SoundCue::Laser, config.laser.as_path()),
            (SoundCue::Explosion, config.explosion.as_path()),
            (SoundCue::Upgrade, config.upgrade.as_path()),
        ];
        let (music, effects) = if config.muted {
            log::info!("audio muted");
            (None, sources.map(|(cue, _)| (cue, None)))
        } else {
            let music = load_or_mute(&mut output, Channel::Music, &config.music);
            let effects = sources
                .map(|(cue, path)| (cue, load_or_mute(&mut output, Channel::Effect(cue), path)));
            (music, effects)
        };
        Self::with_clips(
            output,
            music,
            effects,
            config.music_volume,
            config.sfx_volume,
        )
    }

    pub fn with_clips(
        output: O,
        music: Option<Clip>,
        effects: impl IntoIterator<Item = (SoundCue, Option<Clip>)>,
        music_volume: f32,
        sfx_volume: f32,
    ) -> Self {
        Self {
            output,
            music,
            music_volume,
            music_on: false,
            effects: effects
                .into_iter()
                .map(|(cue, clip)| (cue, Voice::new(clip, sfx_volume)))
                .collect(),
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Start the looping music stream.  Already playing is a no-op.
    pub fn play_music(&mut self) {
        if self.music_on {
            return;
        }
        if let Some(clip) = &self.music {
            self.output.start(Channel::Music, clip, self.music_volume);
            self.music_on = true;
        }
    }

    pub fn stop_music(&mut self) {
        if self.music_on {
            self.output.stop(Channel::Music);
            self.music_on = false;
        }
    }

    /// Back to the start of the track.
    pub fn restart_music(&mut self) {
        self.stop_music();
        self.play_music();
    }

    pub fn music_playing(&self) -> bool {
        self.music_on
    }

    /// Advance effect bookkeeping by `dt`.
    pub fn update(&mut self, dt: f32) {
        for voice in self.effects.values_mut() {
            voice.remaining = (voice.remaining - dt).max(0.0);
        }
    }

    /// Fire a one-shot effect.  A cue that is still sounding is cut and
    /// restarted, never layered.
    pub fn play(&mut self, cue: SoundCue) {
        let Some(voice) = self.effects.get_mut(&cue) else {
            return;
        };
        let Some(clip) = &voice.clip else {
            return;
        };
        let channel = Channel::Effect(cue);
        if voice.is_playing() {
            self.output.stop(channel);
        }
        self.output.start(channel, clip, voice.volume);
        voice.remaining = clip.duration;
    }

    pub fn is_playing(&self, cue: SoundCue) -> bool {
        self.effects.get(&cue).is_some_and(Voice::is_playing)
    }
}

// ── Device output ─────────────────────────────────────────────────────────────

/// Plays through the default audio device, one sink per channel.
#[cfg(feature = "playback")]
pub struct RodioOutput {
    stream: rodio::OutputStream,
    sounds: HashMap<Channel, Sound>,
    sinks: HashMap<Channel, rodio::Sink>,
}

#[cfg(feature = "playback")]
impl RodioOutput {
    pub fn open() -> Result<Self, rodio::StreamError> {
        let stream = rodio::OutputStreamBuilder::open_default_stream()?;
        Ok(Self {
            stream,
            sounds: HashMap::new(),
            sinks: HashMap::new(),
        })
    }
}

#[cfg(feature = "playback")]
impl AudioOutput for RodioOutput {
    fn load(&mut self, channel: Channel, path: &Path) -> Result<Clip, AssetError> {
        let (clip, sound) = decode(path)?;
        self.sounds.insert(channel, sound);
        Ok(clip)
    }

    fn start(&mut self, channel: Channel, _clip: &Clip, volume: f32) {
        let Some(sound) = self.sounds.get(&channel) else {
            return;
        };
        let sink = rodio::Sink::connect_new(self.stream.mixer());
        sink.set_volume(volume);
        match channel {
            Channel::Music => sink.append(sound.clone().repeat_infinite()),
            Channel::Effect(_) => sink.append(sound.clone()),
        }
        // replacing a finished sink drops it
        self.sinks.insert(channel, sink);
    }

    fn stop(&mut self, channel: Channel) {
        if let Some(sink) = self.sinks.remove(&channel) {
            sink.stop();
        }
    }
}

// ── Terminal fallback ─────────────────────────────────────────────────────────

/// Used when no audio device is available: explosions ring the bell,
/// everything else is tracked but silent.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> AudioOutput for TerminalBell<W> {
    fn load(&mut self, _channel: Channel, path: &Path) -> Result<Clip, AssetError> {
        load_clip(path)
    }

    fn start(&mut self, channel: Channel, _clip: &Clip, volume: f32) {
        if channel == Channel::Effect(SoundCue::Explosion) && volume > 0.0 {
            let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        }
    }

    fn stop(&mut self, _channel: Channel) {}
}
