use crate::error::PredictError;

use super::linalg::solve;

/// Inverse L2 regularization strength.
const C: f64 = 1.0;
const MAX_ITERATIONS: usize = 100;
const GRADIENT_TOLERANCE: f64 = 1e-8;

/// (humidity %, cloud cover %, pressure hPa, wind m/s) → rained.
const TRAINING: [([f64; 4], bool); 10] = [
    ([80.0, 90.0, 1005.0, 5.0], true),
    ([75.0, 85.0, 1008.0, 4.0], true),
    ([70.0, 75.0, 1010.0, 3.0], true),
    ([30.0, 20.0, 1020.0, 2.0], false),
    ([25.0, 15.0, 1022.0, 1.0], false),
    ([35.0, 25.0, 1018.0, 2.0], false),
    ([85.0, 95.0, 1000.0, 6.0], true),
    ([20.0, 10.0, 1025.0, 1.0], false),
    ([65.0, 60.0, 1012.0, 3.0], true),
    ([90.0, 100.0, 995.0, 8.0], true),
];

/// Daily averages fed to the rain model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainFeatures {
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub pressure_hpa: f64,
    pub wind_speed_mps: f64,
}

impl RainFeatures {
    fn as_array(&self) -> [f64; 4] {
        [
            self.humidity_pct,
            self.cloud_cover_pct,
            self.pressure_hpa,
            self.wind_speed_mps,
        ]
    }
}

/// L2-regularized logistic regression over [`RainFeatures`].
#[derive(Debug, Clone, PartialEq)]
pub struct RainModel {
    weights: [f64; 4],
    intercept: f64,
}

impl RainModel {
    /// Fit on the built-in synthetic dataset.
    pub fn fit() -> Result<Self, PredictError> {
        Self::fit_on(&TRAINING)
    }

    /// Newton's method on the penalized log-loss `C·Σ loss + ½‖w‖²`, intercept unpenalized.
    /// The objective is strictly convex, so the result depends only on the samples.
    fn fit_on(samples: &[([f64; 4], bool)]) -> Result<Self, PredictError> {
        let mut theta = [0.0; 5];

        for _ in 0..MAX_ITERATIONS {
            let (gradient, hessian) = derivatives(samples, &theta);
            if norm(&gradient) < GRADIENT_TOLERANCE {
                break;
            }

            let step = solve(hessian, gradient.map(|g| -g)).ok_or(PredictError::Singular)?;
            let slope: f64 = gradient.iter().zip(&step).map(|(g, s)| g * s).sum();
            let current = objective(samples, &theta);

            // Backtracking keeps early steps from overshooting on unscaled features.
            let mut t = 1.0;
            let mut next = advance(&theta, &step, t);
            while objective(samples, &next) > current + 1e-4 * t * slope && t > 1e-10 {
                t *= 0.5;
                next = advance(&theta, &step, t);
            }
            theta = next;
        }

        Ok(Self {
            weights: [theta[0], theta[1], theta[2], theta[3]],
            intercept: theta[4],
        })
    }

    /// Positive-class probability in `[0, 1]`.
    pub fn probability(&self, features: RainFeatures) -> f64 {
        sigmoid(self.decision(&features.as_array()))
    }

    /// Chance of rain as a percentage with one decimal.
    pub fn rain_probability(&self, features: RainFeatures) -> f64 {
        (self.probability(features) * 1000.0).round() / 10.0
    }

    fn decision(&self, x: &[f64; 4]) -> f64 {
        self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.intercept
    }
}

fn augmented(x: &[f64; 4]) -> [f64; 5] {
    [x[0], x[1], x[2], x[3], 1.0]
}

fn dot(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64; 5]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn advance(theta: &[f64; 5], step: &[f64; 5], t: f64) -> [f64; 5] {
    let mut next = *theta;
    for (n, s) in next.iter_mut().zip(step) {
        *n += t * s;
    }
    next
}

fn derivatives(samples: &[([f64; 4], bool)], theta: &[f64; 5]) -> ([f64; 5], [[f64; 5]; 5]) {
    let mut gradient = [0.0; 5];
    let mut hessian = [[0.0; 5]; 5];

    for (x, label) in samples {
        let xa = augmented(x);
        let p = sigmoid(dot(theta, &xa));
        let y = if *label { 1.0 } else { 0.0 };
        let w = p * (1.0 - p);

        for j in 0..5 {
            gradient[j] += C * (p - y) * xa[j];
            for k in 0..5 {
                hessian[j][k] += C * w * xa[j] * xa[k];
            }
        }
    }

    for j in 0..4 {
        gradient[j] += theta[j];
        hessian[j][j] += 1.0;
    }

    (gradient, hessian)
}

fn objective(samples: &[([f64; 4], bool)], theta: &[f64; 5]) -> f64 {
    let loss: f64 = samples
        .iter()
        .map(|(x, label)| {
            let z = dot(theta, &augmented(x));
            let y = if *label { 1.0 } else { 0.0 };
            softplus(z) - y * z
        })
        .sum();
    let penalty: f64 = theta[..4].iter().map(|w| w * w).sum();
    C * loss + 0.5 * penalty
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `ln(1 + e^z)` without overflow.
fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(humidity: f64, cloud: f64, pressure: f64, wind: f64) -> RainFeatures {
        RainFeatures {
            humidity_pct: humidity,
            cloud_cover_pct: cloud,
            pressure_hpa: pressure,
            wind_speed_mps: wind,
        }
    }

    #[test]
    fn separates_training_extremes() {
        let model = RainModel::fit().expect("fits");

        for (x, label) in TRAINING {
            let p = model.rain_probability(features(x[0], x[1], x[2], x[3]));
            if label {
                assert!(p > 90.0, "{x:?} → {p}");
            } else {
                assert!(p < 10.0, "{x:?} → {p}");
            }
        }
    }

    #[test]
    fn ambiguous_conditions_land_in_between() {
        let model = RainModel::fit().expect("fits");
        let p = model.rain_probability(features(50.0, 50.0, 1013.0, 3.0));
        assert!(p > 60.0 && p < 95.0, "{p}");
    }

    #[test]
    fn refits_are_identical() {
        let a = RainModel::fit().expect("fits");
        let b = RainModel::fit().expect("fits");
        assert_eq!(a, b);

        let x = features(62.3, 48.0, 1011.7, 4.4);
        assert_eq!(a.rain_probability(x), b.rain_probability(x));
    }

    #[test]
    fn probability_stays_in_percent_range() {
        let model = RainModel::fit().expect("fits");
        let extremes = [
            features(0.0, 0.0, 1100.0, 0.0),
            features(100.0, 100.0, 870.0, 60.0),
            features(100.0, 0.0, 1013.0, 0.0),
            features(0.0, 100.0, 1013.0, 30.0),
        ];
        for x in extremes {
            let p = model.rain_probability(x);
            assert!((0.0..=100.0).contains(&p), "{x:?} → {p}");
        }
    }

    #[test]
    fn wetter_air_raises_probability() {
        let model = RainModel::fit().expect("fits");
        let dry = model.probability(features(40.0, 40.0, 1015.0, 3.0));
        let humid = model.probability(features(60.0, 40.0, 1015.0, 3.0));
        assert!(humid > dry);
    }

    #[test]
    fn softplus_is_stable_for_large_inputs() {
        assert!((softplus(800.0) - 800.0).abs() < 1e-9);
        assert!(softplus(-800.0) >= 0.0);
        assert!((softplus(0.0) - std::f64::consts::LN_2).abs() < 1e-12);
    }
}
