//! Small statistical models fit on fixed synthetic datasets.
//!
//! Both models are cheap to fit and deterministic, so callers refit them
//! whenever they need one instead of caching a trained instance.

mod linalg;

pub mod feels_like;
pub mod rain;

pub use feels_like::FeelsLikeModel;
pub use rain::{RainFeatures, RainModel};
