//! Seed run configuration loaded via OrthoConfig.
//!
//! Every setting is optional. Values layer from defaults, a configuration
//! file, `FUNNEL_SEEDS_*` environment variables, and command-line flags, so a
//! bare invocation reproduces the standard data set.

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::NaiveDate;
use mockable::Clock;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::generator::SeedPlan;

/// Directory the CSV files are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "./seeds";

/// Users generated by default.
pub const DEFAULT_USER_COUNT: usize = 150;

/// Cap on movement rows by default.
pub const DEFAULT_TARGET_ROWS: usize = 500;

/// RNG seed used by default.
pub const DEFAULT_SEED: u64 = 42;

/// Largest user count a plan accepts.
pub const MAX_USER_COUNT: usize = 1_000_000;

/// Format accepted for the reference date override.
const REFERENCE_DATE_FORMAT: &str = "%Y-%m-%d";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Configuration values controlling a seed run.
///
/// A config file is read from `--config-path`, `FUNNEL_SEEDS_CONFIG_PATH`, or
/// `.funnel_seeds.toml` in the working or home directory.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FUNNEL_SEEDS")]
pub struct SeedSettings {
    /// Directory the CSV files are written to.
    #[ortho_config(default = default_output_dir())]
    pub output_dir: Option<PathBuf>,
    /// Number of users to generate.
    #[ortho_config(default = DEFAULT_USER_COUNT)]
    pub user_count: Option<usize>,
    /// Maximum number of movement rows.
    #[ortho_config(default = DEFAULT_TARGET_ROWS)]
    pub target_rows: Option<usize>,
    /// RNG seed value.
    #[ortho_config(default = DEFAULT_SEED)]
    pub seed: Option<u64>,
    /// Reference date (`YYYY-MM-DD`) that user ages are measured from.
    pub reference_date: Option<String>,
}

impl SeedSettings {
    /// Loads settings from the environment, config files, and `args`.
    ///
    /// The first item of `args` is the program name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if any source cannot be read or a value
    /// has the wrong type.
    pub fn load_from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = OsString>,
    {
        Self::load_from_iter(args).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Return the configured output directory, falling back to the default.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }

    /// Return the configured user count, falling back to the default.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.user_count.unwrap_or(DEFAULT_USER_COUNT)
    }

    /// Return the configured row target, falling back to the default.
    #[must_use]
    pub fn target_rows(&self) -> usize {
        self.target_rows.unwrap_or(DEFAULT_TARGET_ROWS)
    }

    /// Return the configured RNG seed, falling back to the default.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    /// Return the configured reference date, falling back to today in UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidReferenceDate`] if the override is not
    /// a `YYYY-MM-DD` date.
    pub fn reference_date(&self, clock: &dyn Clock) -> Result<NaiveDate, ConfigError> {
        match self.reference_date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), REFERENCE_DATE_FORMAT).map_err(
                |err| ConfigError::InvalidReferenceDate {
                    value: raw.to_owned(),
                    message: err.to_string(),
                },
            ),
            None => Ok(clock.utc().date_naive()),
        }
    }
}

impl SeedPlan {
    /// Resolves a generation plan from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UserCountOutOfRange`] if the user count exceeds
    /// [`MAX_USER_COUNT`], or [`ConfigError::InvalidReferenceDate`] if the
    /// reference date override is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use funnel_seeds::{SeedPlan, SeedSettings};
    /// use mockable::DefaultClock;
    ///
    /// let settings = SeedSettings {
    ///     reference_date: Some("2025-06-15".to_owned()),
    ///     ..SeedSettings::default()
    /// };
    ///
    /// let plan = SeedPlan::from_settings(&settings, &DefaultClock).expect("valid plan");
    /// assert_eq!(plan.seed(), 42);
    /// assert_eq!(plan.user_count(), 150);
    /// assert_eq!(plan.target_rows(), 500);
    /// ```
    pub fn from_settings(settings: &SeedSettings, clock: &dyn Clock) -> Result<Self, ConfigError> {
        let user_count = settings.user_count();
        if user_count > MAX_USER_COUNT {
            return Err(ConfigError::UserCountOutOfRange {
                value: user_count,
                max: MAX_USER_COUNT,
            });
        }

        Ok(Self::new(
            settings.seed(),
            user_count,
            settings.target_rows(),
            settings.reference_date(clock)?,
        ))
    }
}
