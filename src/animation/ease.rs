/// Monotonic remapping of normalized progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    #[default]
    Linear,
    /// `t^k`: slow start.
    In { exponent: f64 },
    /// `1 - (1 - t)^k`: slow finish.
    Out { exponent: f64 },
}

impl Ease {
    /// Smallest and largest accepted values of the signed ease parameter.
    pub const PARAM_MIN: i64 = -50;
    pub const PARAM_MAX: i64 = 50;

    /// Builds the curve from the signed UI parameter `p` in `[-50, 50]`:
    /// `0` is linear, positive values ease out and negative values ease in,
    /// with exponent `1 + |p| / 25`.
    pub fn from_param(p: i64) -> Self {
        let p = p.clamp(Self::PARAM_MIN, Self::PARAM_MAX);
        let exponent = 1.0 + (p.unsigned_abs() as f64) / 25.0;
        match p {
            0 => Self::Linear,
            p if p > 0 => Self::Out { exponent },
            _ => Self::In { exponent },
        }
    }

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::In { exponent } => t.powf(exponent),
            Self::Out { exponent } => 1.0 - (1.0 - t).powf(exponent),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
