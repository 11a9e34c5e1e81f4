//! WAV sample playback.
//!
//! Each [`Sound`] owns its own SDL audio queue opened to match the WAV's
//! sample rate and channel count, so sounds mix in the OS mixer rather than
//! in the engine. Volume is applied when samples are queued; the decoded
//! samples themselves are kept unscaled.

use std::path::Path;

use sdl2::audio::{AudioFormat, AudioQueue, AudioSpecDesired, AudioSpecWAV};
use sdl2::AudioSubsystem;

enum Queue {
    U8 {
        device: AudioQueue<u8>,
        samples: Vec<u8>,
    },
    S16 {
        device: AudioQueue<i16>,
        samples: Vec<i16>,
    },
    F32 {
        device: AudioQueue<f32>,
        samples: Vec<f32>,
    },
}

/// A loaded sound effect.
pub struct Sound {
    queue: Queue,
    volume: f32,
}

impl Sound {
    /// Load a WAV file and open a matching playback queue. 8-bit unsigned,
    /// 16-bit signed and 32-bit float samples are supported.
    pub fn load(audio: &AudioSubsystem, path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let wav = AudioSpecWAV::load_wav(path)
            .map_err(|e| format!("could not load sound {}: {e}", path.display()))?;
        let desired = AudioSpecDesired {
            freq: Some(wav.freq),
            channels: Some(wav.channels),
            samples: None,
        };

        let queue = match wav.format {
            AudioFormat::U8 => Queue::U8 {
                device: audio.open_queue::<u8, _>(None, &desired)?,
                samples: wav.buffer().to_vec(),
            },
            AudioFormat::S16LSB | AudioFormat::S16MSB => {
                let big = wav.format == AudioFormat::S16MSB;
                let samples = wav
                    .buffer()
                    .chunks_exact(2)
                    .map(|pair| {
                        let bytes = [pair[0], pair[1]];
                        if big {
                            i16::from_be_bytes(bytes)
                        } else {
                            i16::from_le_bytes(bytes)
                        }
                    })
                    .collect();
                Queue::S16 {
                    device: audio.open_queue::<i16, _>(None, &desired)?,
                    samples,
                }
            }
            AudioFormat::F32LSB => {
                let samples = wav
                    .buffer()
                    .chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect();
                Queue::F32 {
                    device: audio.open_queue::<f32, _>(None, &desired)?,
                    samples,
                }
            }
            other => {
                return Err(format!(
                    "unsupported sample format {other:?} in {}",
                    path.display()
                ))
            }
        };

        Ok(Self { queue, volume: 1.0 })
    }

    /// Restart playback from the beginning at the current volume.
    pub fn play(&self) -> Result<(), String> {
        match &self.queue {
            Queue::U8 { device, samples } => {
                device.clear();
                device.queue_audio(&scale_u8(samples, self.volume))?;
                device.resume();
            }
            Queue::S16 { device, samples } => {
                device.clear();
                device.queue_audio(&scale_s16(samples, self.volume))?;
                device.resume();
            }
            Queue::F32 { device, samples } => {
                device.clear();
                device.queue_audio(&scale_f32(samples, self.volume))?;
                device.resume();
            }
        }
        Ok(())
    }

    pub fn pause(&self) {
        match &self.queue {
            Queue::U8 { device, .. } => device.pause(),
            Queue::S16 { device, .. } => device.pause(),
            Queue::F32 { device, .. } => device.pause(),
        }
    }

    pub fn resume(&self) {
        match &self.queue {
            Queue::U8 { device, .. } => device.resume(),
            Queue::S16 { device, .. } => device.resume(),
            Queue::F32 { device, .. } => device.resume(),
        }
    }

    /// Drop any queued samples and stop output.
    pub fn stop(&self) {
        match &self.queue {
            Queue::U8 { device, .. } => {
                device.clear();
                device.pause();
            }
            Queue::S16 { device, .. } => {
                device.clear();
                device.pause();
            }
            Queue::F32 { device, .. } => {
                device.clear();
                device.pause();
            }
        }
    }

    /// True once every queued sample has been consumed.
    pub fn is_finished(&self) -> bool {
        let queued = match &self.queue {
            Queue::U8 { device, .. } => device.size(),
            Queue::S16 { device, .. } => device.size(),
            Queue::F32 { device, .. } => device.size(),
        };
        queued == 0
    }

    /// Set playback volume, clamped to 0.0..=1.0. Takes effect on the next
    /// `play`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

// Unsigned 8-bit audio is centered on 128, so attenuation pulls samples
// toward 128 rather than 0.
fn scale_u8(samples: &[u8], volume: f32) -> Vec<u8> {
    samples
        .iter()
        .map(|&s| (128.0 + (f32::from(s) - 128.0) * volume) as u8)
        .collect()
}

fn scale_s16(samples: &[i16], volume: f32) -> Vec<i16> {
    samples.iter().map(|&s| (f32::from(s) * volume) as i16).collect()
}

fn scale_f32(samples: &[f32], volume: f32) -> Vec<f32> {
    samples.iter().map(|&s| s * volume).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_scaling_centers_on_silence() {
        assert_eq!(scale_u8(&[128, 128], 0.5), vec![128, 128]);
        assert_eq!(scale_u8(&[228, 28], 0.5), vec![178, 78]);
        assert_eq!(scale_u8(&[228, 28], 0.0), vec![128, 128]);
    }

    #[test]
    fn test_s16_scaling() {
        assert_eq!(scale_s16(&[1000, -1000, 0], 0.5), vec![500, -500, 0]);
        assert_eq!(scale_s16(&[i16::MAX], 1.0), vec![i16::MAX]);
    }

    #[test]
    fn test_f32_scaling() {
        assert_eq!(scale_f32(&[0.8, -0.4], 0.25), vec![0.2, -0.1]);
    }
}
