//! Alert signal seam and the siren waveform.
//!
//! `Siren` is an endless mono sample stream: an oscillator whose pitch sweeps
//! up and back down across a narrow band, multiplied by a gain envelope that
//! pulses between a near-silent floor and the audible level.

use std::f32::consts::TAU;
use std::time::Duration;

/// Start/stop control over an audible alert.
///
/// Implementations own their audio session outright. `start` while already
/// active must replace the running session rather than layer a second one,
/// and `stop` must be safe to call at any time.
pub trait AlertSignal {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_active(&self) -> bool;
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Waveform {
    Sine,
    Square,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct SirenParams {
    pub waveform: Waveform,
    pub low_hz: f32,
    pub high_hz: f32,
    /// Time for one full low -> high -> low sweep.
    pub sweep_period: Duration,
    /// Envelope pulses per second.
    pub pulse_hz: f32,
    /// Fraction of each pulse spent rising to `level`.
    pub attack: f32,
    pub floor: f32,
    pub level: f32,
}

impl Default for SirenParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Square,
            low_hz: 600.0,
            high_hz: 900.0,
            sweep_period: Duration::from_secs(1),
            pulse_hz: 2.0,
            attack: 0.2,
            floor: 0.02,
            level: 0.5,
        }
    }
}

pub struct Siren {
    params: SirenParams,
    sample_rate: u32,
    phase: f32,
    sample_index: u64,
    /// Samples after which sweep and envelope both repeat, 0 if they never do
    cycle: u64,
}

impl Siren {
    pub fn new(params: SirenParams, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        Self {
            params,
            sample_rate,
            phase: 0.0,
            sample_index: 0,
            cycle: sweep_cycle_samples(&params, sample_rate),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Oscillator frequency `secs` into the alert.
    pub fn frequency_at(&self, secs: f64) -> f32 {
        let period = self.params.sweep_period.as_secs_f64();
        if period <= 0.0 {
            return self.params.low_hz;
        }
        let pos = (secs / period).fract() as f32;
        let span = self.params.high_hz - self.params.low_hz;
        if pos < 0.5 {
            self.params.low_hz + span * pos * 2.0
        } else {
            self.params.high_hz - span * (pos - 0.5) * 2.0
        }
    }

    /// Envelope gain `secs` into the alert.
    pub fn gain_at(&self, secs: f64) -> f32 {
        let SirenParams { floor, level, pulse_hz, .. } = self.params;
        if pulse_hz <= 0.0 {
            return level;
        }
        let attack = self.params.attack.clamp(f32::EPSILON, 1.0);
        let pos = (secs * pulse_hz as f64).fract() as f32;
        if pos < attack {
            floor + (level - floor) * pos / attack
        } else {
            level - (level - floor) * (pos - attack) / (1.0 - attack)
        }
    }

    fn oscillator(&self) -> f32 {
        match self.params.waveform {
            Waveform::Sine => (self.phase * TAU).sin(),
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl Iterator for Siren {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let secs = self.sample_index as f64 / self.sample_rate as f64;
        let sample = self.oscillator() * self.gain_at(secs);

        self.phase = (self.phase + self.frequency_at(secs) / self.sample_rate as f32).fract();
        self.sample_index += 1;
        if self.sample_index == self.cycle {
            self.sample_index = 0;
        }
        Some(sample)
    }
}

/// Samples after which both the sweep and the envelope repeat exactly, or 0
/// if the two periods don't share a whole-sample cycle.
fn sweep_cycle_samples(params: &SirenParams, sample_rate: u32) -> u64 {
    let sweep = (params.sweep_period.as_secs_f64() * sample_rate as f64).round() as u64;
    if sweep == 0 || params.pulse_hz <= 0.0 {
        return sweep;
    }
    let pulses = params.sweep_period.as_secs_f64() * params.pulse_hz as f64;
    if (pulses - pulses.round()).abs() < 1e-9 {
        sweep
    } else {
        0
    }
}
