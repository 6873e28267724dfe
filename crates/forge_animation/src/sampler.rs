//! Parametric samplers
//!
//! A [`Sampler`] maps a time value `t` to a channel value. What `t` means
//! (normalized progress, frame number or seconds) is decided by the
//! [`FrameSpan`](crate::synthesizer::FrameSpan) driving it.

use std::f32::consts::TAU;
use std::fmt;
use std::sync::Arc;

use forge_core::errors::{ForgeError, Result};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    #[inline]
    #[must_use]
    pub fn eval(self, x: f32) -> f32 {
        match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
        }
    }
}

pub type SampleFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

#[derive(Clone)]
pub enum Sampler {
    Constant(f32),
    /// `offset + amplitude * wave(2π * frequency * t + phase)`.
    Oscillation {
        wave: Wave,
        amplitude: f32,
        frequency: f32,
        phase: f32,
        offset: f32,
    },
    /// `start + (end - start) * t`.
    Ramp { start: f32, end: f32 },
    /// `base + U(-spread, spread)`, drawn independently for every sample.
    Jitter { base: f32, spread: f32 },
    Sum(Vec<Sampler>),
    Custom(SampleFn),
}

impl Sampler {
    #[must_use]
    pub fn sin(amplitude: f32, frequency: f32) -> Self {
        Self::oscillation(Wave::Sin, amplitude, frequency, 0.0)
    }

    #[must_use]
    pub fn cos(amplitude: f32, frequency: f32) -> Self {
        Self::oscillation(Wave::Cos, amplitude, frequency, 0.0)
    }

    #[must_use]
    pub fn oscillation(wave: Wave, amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self::Oscillation {
            wave,
            amplitude,
            frequency,
            phase,
            offset: 0.0,
        }
    }

    /// Oscillation given as an angular speed: `amplitude * wave(speed * t + phase)`.
    #[must_use]
    pub fn angular(wave: Wave, amplitude: f32, speed: f32, phase: f32) -> Self {
        Self::oscillation(wave, amplitude, speed / TAU, phase)
    }

    #[must_use]
    pub fn ramp(start: f32, end: f32) -> Self {
        Self::Ramp { start, end }
    }

    #[must_use]
    pub fn jitter(base: f32, spread: f32) -> Self {
        Self::Jitter { base, spread }
    }

    pub fn custom(f: impl Fn(f32) -> f32 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Adds a constant to an oscillation's offset, or wraps `self` in a sum.
    #[must_use]
    pub fn plus(self, other: Sampler) -> Self {
        match (self, other) {
            (
                Self::Oscillation {
                    wave,
                    amplitude,
                    frequency,
                    phase,
                    offset,
                },
                Self::Constant(c),
            ) => Self::Oscillation {
                wave,
                amplitude,
                frequency,
                phase,
                offset: offset + c,
            },
            (Self::Sum(mut terms), other) => {
                terms.push(other);
                Self::Sum(terms)
            }
            (a, b) => Self::Sum(vec![a, b]),
        }
    }

    /// True when sampling draws from the random source.
    #[must_use]
    pub fn is_random(&self) -> bool {
        match self {
            Self::Jitter { spread, .. } => *spread != 0.0,
            Self::Sum(terms) => terms.iter().any(Sampler::is_random),
            _ => false,
        }
    }

    /// Rejects a jitter whose spread is NaN or infinite, at any depth.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Jitter { spread, .. } if !spread.is_finite() => Err(ForgeError::InvalidParameter(format!(
                "jitter spread {spread} must be finite"
            ))),
            Self::Sum(terms) => terms.iter().try_for_each(Sampler::validate),
            _ => Ok(()),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, t: f32, rng: &mut R) -> f32 {
        match self {
            Self::Constant(value) => *value,
            Self::Oscillation {
                wave,
                amplitude,
                frequency,
                phase,
                offset,
            } => offset + amplitude * wave.eval(TAU * frequency * t + phase),
            Self::Ramp { start, end } => start + (end - start) * t,
            Self::Jitter { base, spread } => forge_core::random::jitter(rng, *base, *spread),
            Self::Sum(terms) => terms.iter().map(|s| s.sample(t, rng)).sum(),
            Self::Custom(f) => f(t),
        }
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Oscillation {
                wave,
                amplitude,
                frequency,
                phase,
                offset,
            } => f
                .debug_struct("Oscillation")
                .field("wave", wave)
                .field("amplitude", amplitude)
                .field("frequency", frequency)
                .field("phase", phase)
                .field("offset", offset)
                .finish(),
            Self::Ramp { start, end } => f
                .debug_struct("Ramp")
                .field("start", start)
                .field("end", end)
                .finish(),
            Self::Jitter { base, spread } => f
                .debug_struct("Jitter")
                .field("base", base)
                .field("spread", spread)
                .finish(),
            Self::Sum(terms) => f.debug_tuple("Sum").field(terms).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
