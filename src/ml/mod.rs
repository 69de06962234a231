//! The forecasting pipeline: calendar feature engineering, a reproducible
//! train/test split, an ordinary-least-squares fit, and day-ahead attendance
//! forecasts.

pub mod features;
pub mod forecast;
pub mod linear;
pub mod metrics;
pub mod model;
pub mod split;
