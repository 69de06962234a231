use anyhow::Result;
use config::Config;
use serde::Deserialize;
use std::path::PathBuf;

pub mod analytics;
pub mod cli;
pub mod display;
pub mod export;
pub mod manager;
pub mod ml;
pub mod models;
pub mod reports;
pub mod roster;
pub mod schema;

/// Settings loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory holding the CSV artifacts of the pipeline.
    pub data_dir: PathBuf,
    /// Where the trained model JSON is stored.
    pub model_path: PathBuf,
    /// Present-rate (percent) below which a student is flagged.
    pub low_attendance_threshold: f64,
    /// How many days the forecast covers.
    pub forecast_days: u32,
    /// Kilograms of food to prepare per predicted student.
    pub food_kg_per_student: f64,
}

impl Settings {
    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join("attendance_summary.csv")
    }

    pub fn features_path(&self) -> PathBuf {
        self.data_dir.join("attendance_features.csv")
    }

    pub fn train_path(&self) -> PathBuf {
        self.data_dir.join("train_data.csv")
    }

    pub fn test_path(&self) -> PathBuf {
        self.data_dir.join("test_data.csv")
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    attendance: Settings,
}

/// Loads configuration from `config.toml`.
pub fn load_settings() -> Result<Settings> {
    let settings = Config::builder()
        .add_source(config::File::with_name("config"))
        .build()?;

    let file: SettingsFile = settings.try_deserialize()?;
    Ok(file.attendance)
}
