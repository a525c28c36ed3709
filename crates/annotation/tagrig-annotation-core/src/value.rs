//! Keyframe value kinds and interpolation tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Width of the fixed value slot keyframes are exported with. Scalars occupy slot 0.
pub const VALUE_SLOT_LEN: usize = 3;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Vector,
}

/// Keyframe payload: one channel sample, or a small vector of samples.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Scalar(f32),
    Vector(Vec<f32>),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vector(_) => ValueKind::Vector,
        }
    }

    /// Channel value used by the scalar algorithms (first component of a vector, 0 when empty).
    #[inline]
    pub fn primary(&self) -> f32 {
        match self {
            Value::Scalar(v) => *v,
            Value::Vector(v) => v.first().copied().unwrap_or(0.0),
        }
    }

    /// Fixed-size slot representation; scalars land in slot 0, extra vector components are kept.
    pub fn to_slot(&self) -> Vec<f32> {
        match self {
            Value::Scalar(v) => {
                let mut slot = vec![0.0; VALUE_SLOT_LEN];
                slot[0] = *v;
                slot
            }
            Value::Vector(v) => {
                let mut slot = v.clone();
                if slot.len() < VALUE_SLOT_LEN {
                    slot.resize(VALUE_SLOT_LEN, 0.0);
                }
                slot
            }
        }
    }

    /// Inverse of [`Value::to_slot`]: a slot whose tail is zero collapses to a scalar.
    pub fn from_slot(slot: &[f32]) -> Value {
        match slot {
            [] => Value::Scalar(0.0),
            [first, rest @ ..] if rest.iter().all(|v| *v == 0.0) => Value::Scalar(*first),
            _ => Value::Vector(slot.to_vec()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(0.0)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v)
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Vector(v)
    }
}

/// Per-keyframe interpolation tag, named the way host editors spell it.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interpolation {
    Constant,
    #[default]
    Linear,
    Bezier,
    Sine,
    Quad,
    Cubic,
    Quart,
    Quint,
    Expo,
    Circ,
    Back,
    Bounce,
    Elastic,
}

impl Interpolation {
    pub const ALL: [Interpolation; 13] = [
        Interpolation::Constant,
        Interpolation::Linear,
        Interpolation::Bezier,
        Interpolation::Sine,
        Interpolation::Quad,
        Interpolation::Cubic,
        Interpolation::Quart,
        Interpolation::Quint,
        Interpolation::Expo,
        Interpolation::Circ,
        Interpolation::Back,
        Interpolation::Bounce,
        Interpolation::Elastic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Constant => "CONSTANT",
            Interpolation::Linear => "LINEAR",
            Interpolation::Bezier => "BEZIER",
            Interpolation::Sine => "SINE",
            Interpolation::Quad => "QUAD",
            Interpolation::Cubic => "CUBIC",
            Interpolation::Quart => "QUART",
            Interpolation::Quint => "QUINT",
            Interpolation::Expo => "EXPO",
            Interpolation::Circ => "CIRC",
            Interpolation::Back => "BACK",
            Interpolation::Bounce => "BOUNCE",
            Interpolation::Elastic => "ELASTIC",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Interpolation::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == upper)
            .ok_or_else(|| format!("unknown interpolation '{s}'"))
    }
}
