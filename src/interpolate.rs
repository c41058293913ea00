// Piecewise-linear remapping between numeric ranges with per-side extrapolation.
// Ranges are validated once at construction; mapping a value is total afterwards.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{Result, TimelineError};

/// Behaviour outside the input range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Continue the outermost segment linearly.
    #[default]
    Extend,
    /// Pin to the outermost output value.
    Clamp,
    /// Return the input value unchanged.
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct InterpolateOptions {
    #[serde(default)]
    pub extrapolate_left: Extrapolate,
    #[serde(default)]
    pub extrapolate_right: Extrapolate,
    #[serde(default)]
    pub easing: Easing,
}

impl InterpolateOptions {
    /// Clamp on both sides.
    pub fn clamp() -> Self {
        InterpolateOptions {
            extrapolate_left: Extrapolate::Clamp,
            extrapolate_right: Extrapolate::Clamp,
            easing: Easing::Linear,
        }
    }

    pub fn clamp_left(mut self) -> Self {
        self.extrapolate_left = Extrapolate::Clamp;
        self
    }

    pub fn clamp_right(mut self) -> Self {
        self.extrapolate_right = Extrapolate::Clamp;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// A validated mapping from an input range to an output range.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    input: Vec<f64>,
    output: Vec<f64>,
    options: InterpolateOptions,
}

impl Interpolation {
    pub fn new(input: &[f64], output: &[f64], options: InterpolateOptions) -> Result<Self> {
        if input.len() < 2 {
            return Err(TimelineError::InvalidRange(format!(
                "input range needs at least 2 values, got {}",
                input.len()
            )));
        }
        if input.len() != output.len() {
            return Err(TimelineError::InvalidRange(format!(
                "input range has {} values but output range has {}",
                input.len(),
                output.len()
            )));
        }
        if let Some(bad) = input.iter().chain(output).find(|v| !v.is_finite()) {
            return Err(TimelineError::InvalidRange(format!(
                "range values must be finite, got {}",
                bad
            )));
        }
        if let Some(pair) = input.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TimelineError::InvalidRange(format!(
                "input range must be strictly increasing, got {} then {}",
                pair[0], pair[1]
            )));
        }

        Ok(Interpolation {
            input: input.to_vec(),
            output: output.to_vec(),
            options,
        })
    }

    pub fn input(&self) -> &[f64] {
        &self.input
    }

    pub fn output(&self) -> &[f64] {
        &self.output
    }

    /// Map a value through the range. Never returns NaN.
    pub fn map(&self, value: f64) -> f64 {
        let last = self.input.len() - 1;

        if value.is_nan() {
            return self.output[0];
        }
        if value.is_infinite() {
            return if value > 0.0 {
                self.output[last]
            } else {
                self.output[0]
            };
        }

        if value < self.input[0] {
            match self.options.extrapolate_left {
                Extrapolate::Clamp => return self.output[0],
                Extrapolate::Identity => return value,
                Extrapolate::Extend => {}
            }
        }
        if value > self.input[last] {
            match self.options.extrapolate_right {
                Extrapolate::Clamp => return self.output[last],
                Extrapolate::Identity => return value,
                Extrapolate::Extend => {}
            }
        }

        // Segment whose upper bound is the first input value >= `value`.
        let upper = self
            .input
            .iter()
            .skip(1)
            .position(|&bound| value <= bound)
            .map_or(last, |i| i + 1);
        let lower = upper - 1;

        let (in_lo, in_hi) = (self.input[lower], self.input[upper]);
        let (out_lo, out_hi) = (self.output[lower], self.output[upper]);

        let t = (value - in_lo) / (in_hi - in_lo);
        // Easing shapes motion inside the range; extrapolation stays linear.
        let eased = if (0.0..=1.0).contains(&t) {
            self.options.easing.apply(t)
        } else {
            t
        };

        out_lo + eased * (out_hi - out_lo)
    }
}

/// Map `value` from `input` to `output`. Equal input bounds are rejected.
pub fn interpolate(
    value: f64,
    input: [f64; 2],
    output: [f64; 2],
    options: InterpolateOptions,
) -> Result<f64> {
    if input[0] == input[1] {
        return Err(TimelineError::InvalidRange(format!(
            "input range bounds are equal ({})",
            input[0]
        )));
    }
    // Descending input ranges are accepted for the two-point form by flipping both sides.
    let interpolation = if input[0] > input[1] {
        Interpolation::new(
            &[input[1], input[0]],
            &[output[1], output[0]],
            InterpolateOptions {
                extrapolate_left: options.extrapolate_right,
                extrapolate_right: options.extrapolate_left,
                easing: options.easing,
            },
        )?
    } else {
        Interpolation::new(&input, &output, options)?
    };
    Ok(interpolation.map(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn perspective_entrance_midpoint() {
        let v = interpolate(0.5, [0.0, 1.0], [20.0, 0.0], InterpolateOptions::default()).unwrap();
        assert!(approx(v, 10.0));
    }

    #[test]
    fn right_clamp_pins_to_end() {
        let opts = InterpolateOptions::default().clamp_right();
        let v = interpolate(1.5, [0.0, 1.0], [0.0, 1.0], opts).unwrap();
        assert_eq!(v, 1.0);
    }

    #[test]
    fn unclamped_extrapolation_continues_linearly() {
        let opts = InterpolateOptions::default();
        assert!(approx(interpolate(1.5, [0.0, 1.0], [0.0, 1.0], opts).unwrap(), 1.5));
        assert!(approx(interpolate(-1.0, [0.0, 1.0], [0.0, 10.0], opts).unwrap(), -10.0));
    }

    #[test]
    fn left_clamp_only_affects_left_side() {
        let opts = InterpolateOptions::default().clamp_left();
        assert_eq!(interpolate(-3.0, [0.0, 1.0], [5.0, 6.0], opts).unwrap(), 5.0);
        assert!(approx(interpolate(2.0, [0.0, 1.0], [5.0, 6.0], opts).unwrap(), 7.0));
    }

    #[test]
    fn identity_extrapolation_passes_value_through() {
        let opts = InterpolateOptions {
            extrapolate_right: Extrapolate::Identity,
            ..Default::default()
        };
        assert_eq!(interpolate(42.0, [0.0, 1.0], [0.0, 100.0], opts).unwrap(), 42.0);
    }

    #[test]
    fn equal_bounds_rejected() {
        let err = interpolate(0.5, [1.0, 1.0], [0.0, 1.0], InterpolateOptions::default());
        assert!(matches!(err, Err(TimelineError::InvalidRange(_))));
    }

    #[test]
    fn descending_two_point_input_is_supported() {
        let v = interpolate(0.25, [1.0, 0.0], [0.0, 100.0], InterpolateOptions::default()).unwrap();
        assert!(approx(v, 75.0));
    }

    #[test]
    fn multi_segment_ranges() {
        let fade = Interpolation::new(
            &[0.0, 10.0, 50.0, 60.0],
            &[0.0, 1.0, 1.0, 0.0],
            InterpolateOptions::clamp(),
        )
        .unwrap();
        assert_eq!(fade.map(-5.0), 0.0);
        assert!(approx(fade.map(5.0), 0.5));
        assert_eq!(fade.map(30.0), 1.0);
        assert!(approx(fade.map(55.0), 0.5));
        assert_eq!(fade.map(100.0), 0.0);
    }

    #[test]
    fn construction_validates_ranges() {
        let opts = InterpolateOptions::default();
        assert!(Interpolation::new(&[0.0], &[1.0], opts).is_err());
        assert!(Interpolation::new(&[0.0, 1.0], &[1.0], opts).is_err());
        assert!(Interpolation::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0], opts).is_err());
        assert!(Interpolation::new(&[0.0, f64::NAN], &[0.0, 1.0], opts).is_err());
    }

    #[test]
    fn non_finite_values_never_produce_nan() {
        let lerp = Interpolation::new(&[0.0, 1.0], &[3.0, 7.0], InterpolateOptions::default())
            .unwrap();
        assert_eq!(lerp.map(f64::NAN), 3.0);
        assert_eq!(lerp.map(f64::INFINITY), 7.0);
        assert_eq!(lerp.map(f64::NEG_INFINITY), 3.0);
    }

    #[test]
    fn easing_applies_inside_range() {
        let opts = InterpolateOptions::clamp().with_easing(Easing::EaseIn);
        let v = interpolate(0.5, [0.0, 1.0], [0.0, 8.0], opts).unwrap();
        assert!(approx(v, 1.0));
    }

    proptest! {
        #[test]
        fn inverse_mapping_round_trips(
            a in -1000.0f64..1000.0,
            span in 0.01f64..1000.0,
            c in -1000.0f64..1000.0,
            out_span in 0.01f64..1000.0,
            frac in 0.0f64..=1.0,
        ) {
            let b = a + span;
            let d = c + out_span;
            let x = a + frac * span;
            let opts = InterpolateOptions::default();
            let y = interpolate(x, [a, b], [c, d], opts).unwrap();
            let back = interpolate(y, [c, d], [a, b], opts).unwrap();
            prop_assert!((back - x).abs() < 1e-6 * (1.0 + x.abs()));
        }

        #[test]
        fn clamped_output_stays_in_bounds(value in -1e6f64..1e6, c in -100.0f64..100.0, d in -100.0f64..100.0) {
            let v = interpolate(value, [0.0, 1.0], [c, d], InterpolateOptions::clamp()).unwrap();
            prop_assert!(v >= c.min(d) - 1e-9 && v <= c.max(d) + 1e-9);
        }
    }
}
