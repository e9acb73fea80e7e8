//! Easing curves for entrance transitions and camera/door tweens.
//!
//! Progress `t` is clamped to [0, 1]; back and elastic overshoot past 1.0
//! on purpose before settling, which is what gives walls and the roof
//! their pop. Every curve hits exactly 0.0 at t=0 and 1.0 at t=1.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadOut,
    QuadInOut,
    CubicOut,
    CubicInOut,
    BackOut,
    BounceOut,
    ElasticOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::CubicOut => 1.0 - (1.0 - t).powi(3),
            Ease::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::BackOut => {
                // Overshoot constant 1.7, the amount used for wall and
                // door entrances.
                let s = 1.7;
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
            Ease::BounceOut => bounce_out(t),
            Ease::ElasticOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    // Amplitude 1, period 0.5.
                    let period = 0.5;
                    let s = period / 4.0;
                    2.0_f32.powf(-10.0 * t)
                        * ((t - s) * std::f32::consts::TAU / period).sin()
                        + 1.0
                }
            }
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;
    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let u = t - 1.5 / d1;
        n1 * u * u + 0.75
    } else if t < 2.5 / d1 {
        let u = t - 2.25 / d1;
        n1 * u * u + 0.9375
    } else {
        let u = t - 2.625 / d1;
        n1 * u * u + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Ease; 8] = [
        Ease::Linear,
        Ease::QuadOut,
        Ease::QuadInOut,
        Ease::CubicOut,
        Ease::CubicInOut,
        Ease::BackOut,
        Ease::BounceOut,
        Ease::ElasticOut,
    ];

    #[test]
    fn test_endpoints() {
        for ease in ALL {
            assert!(ease.apply(0.0).abs() < 1e-5, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-5, "{ease:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_input_clamped() {
        for ease in ALL {
            assert!(ease.apply(-3.0).abs() < 1e-5, "{ease:?} below range");
            assert!((ease.apply(42.0) - 1.0).abs() < 1e-5, "{ease:?} above range");
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (0..100)
            .map(|i| Ease::BackOut.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "back-out should overshoot, peaked at {peak}");
    }

    #[test]
    fn test_elastic_out_overshoots() {
        let peak = (0..200)
            .map(|i| Ease::ElasticOut.apply(i as f32 / 200.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0, "elastic-out should overshoot, peaked at {peak}");
    }

    #[test]
    fn test_monotone_curves_are_monotone() {
        // Bounce, back, and elastic are deliberately non-monotone; the
        // plain polynomial eases must never move backwards.
        for ease in [Ease::Linear, Ease::QuadOut, Ease::QuadInOut, Ease::CubicOut, Ease::CubicInOut] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease.apply(i as f32 / 100.0);
                assert!(v >= prev - 1e-6, "{ease:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_bounce_out_midpoint_value() {
        // Inside the first bounce segment: 7.5625 * 0.3^2 = 0.680625.
        assert!((Ease::BounceOut.apply(0.3) - 0.680625).abs() < 1e-5);
    }
}
