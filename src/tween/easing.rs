use std::f32::consts::PI;

/// Easing curves for tween progress, named after the tween.js family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadraticIn,
    #[default]
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SinusoidalInOut,
    ExponentialOut,
    BackOut,
    ElasticOut,
}

impl Easing {
    /// Map linear progress `k` to eased progress.
    ///
    /// Input is clamped to `[0, 1]` and both endpoints are returned exactly, so a
    /// finished tween always lands on its target value.
    pub fn apply(self, k: f32) -> f32 {
        if k.is_nan() || k <= 0.0 {
            return 0.0;
        }
        if k >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => k,
            Self::QuadraticIn => k * k,
            Self::QuadraticOut => k * (2.0 - k),
            Self::QuadraticInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k
                } else {
                    let k = k - 1.0;
                    -0.5 * (k * (k - 2.0) - 1.0)
                }
            }
            Self::CubicIn => k * k * k,
            Self::CubicOut => {
                let k = k - 1.0;
                k * k * k + 1.0
            }
            Self::CubicInOut => {
                let k = k * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * k + 2.0)
                }
            }
            Self::SinusoidalInOut => 0.5 * (1.0 - (PI * k).cos()),
            Self::ExponentialOut => 1.0 - 2.0f32.powf(-10.0 * k),
            Self::BackOut => {
                const S: f32 = 1.70158;
                let k = k - 1.0;
                k * k * ((S + 1.0) * k + S) + 1.0
            }
            Self::ElasticOut => 2.0f32.powf(-10.0 * k) * ((k - 0.1) * 5.0 * PI).sin() + 1.0,
        }
    }
}
