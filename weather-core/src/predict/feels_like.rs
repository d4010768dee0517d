use crate::error::PredictError;

use super::linalg::solve;

const TRAINING_HUMIDITY: [f64; 14] = [
    30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 35.0, 45.0, 55.0, 65.0, 75.0, 85.0, 95.0,
];

const TRAINING_TEMPERATURE: [f64; 14] = [
    15.0, 18.0, 20.0, 22.0, 25.0, 28.0, 30.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0,
];

/// Synthetic target: mostly temperature, nudged up by humidity.
fn synthetic_feels_like(humidity: f64, temperature: f64) -> f64 {
    temperature * 0.9 + (humidity / 100.0) * 3.0
}

/// Ordinary least squares: feels-like ≈ a·humidity + b·temperature + c.
#[derive(Debug, Clone, PartialEq)]
pub struct FeelsLikeModel {
    humidity_coef: f64,
    temperature_coef: f64,
    intercept: f64,
}

impl FeelsLikeModel {
    pub fn fit() -> Result<Self, PredictError> {
        let samples: Vec<(f64, f64, f64)> = TRAINING_HUMIDITY
            .iter()
            .zip(TRAINING_TEMPERATURE)
            .map(|(&h, t)| (h, t, synthetic_feels_like(h, t)))
            .collect();
        Self::fit_on(&samples)
    }

    /// Solves the normal equations `XᵀX β = Xᵀy` with X = [1, humidity, temperature].
    fn fit_on(samples: &[(f64, f64, f64)]) -> Result<Self, PredictError> {
        let mut xtx = [[0.0; 3]; 3];
        let mut xty = [0.0; 3];

        for &(h, t, y) in samples {
            let row = [1.0, h, t];
            for j in 0..3 {
                xty[j] += row[j] * y;
                for k in 0..3 {
                    xtx[j][k] += row[j] * row[k];
                }
            }
        }

        let [intercept, humidity_coef, temperature_coef] =
            solve(xtx, xty).ok_or(PredictError::Singular)?;

        Ok(Self {
            humidity_coef,
            temperature_coef,
            intercept,
        })
    }

    /// Predicted feels-like temperature (°C), rounded to 2 decimals.
    pub fn predict(&self, humidity_pct: f64, temperature_c: f64) -> f64 {
        let raw = self.humidity_coef * humidity_pct
            + self.temperature_coef * temperature_c
            + self.intercept;
        (raw * 100.0).round() / 100.0
    }
}
