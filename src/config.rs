use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DATA_PATH_VAR: &str = "LAUNCH_DASH_DATA";
pub const SLIDER_MIN_VAR: &str = "LAUNCH_DASH_SLIDER_MIN";
pub const SLIDER_MAX_VAR: &str = "LAUNCH_DASH_SLIDER_MAX";
pub const SLIDER_STEP_VAR: &str = "LAUNCH_DASH_SLIDER_STEP";

const DEFAULT_DATA_PATH: &str = "spacex_launch_dash.csv";

/// Upper limit on slider tick marks; finer steps are rejected.
pub const MAX_SLIDER_TICKS: usize = 1000;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// Settings resolved once at startup from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashConfig {
    /// Dataset loaded before the window opens.
    pub data_path: PathBuf,
    /// Payload slider bounds and step, in kg.
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_step: f64,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            slider_min: 0.0,
            slider_max: 10_000.0,
            slider_step: 1_000.0,
        }
    }
}

impl DashConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = DashConfig::default();

        if let Some(path) = lookup(DATA_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(v) = lookup(SLIDER_MIN_VAR) {
            config.slider_min = parse_kg(SLIDER_MIN_VAR, &v)?;
        }
        if let Some(v) = lookup(SLIDER_MAX_VAR) {
            config.slider_max = parse_kg(SLIDER_MAX_VAR, &v)?;
        }
        if let Some(v) = lookup(SLIDER_STEP_VAR) {
            config.slider_step = parse_kg(SLIDER_STEP_VAR, &v)?;
        }

        if config.slider_min >= config.slider_max {
            bail!(
                "slider bounds must satisfy min < max, got [{}, {}]",
                config.slider_min,
                config.slider_max
            );
        }
        if config.slider_step <= 0.0 {
            bail!("{SLIDER_STEP_VAR} must be positive, got {}", config.slider_step);
        }
        let ticks = (config.slider_max - config.slider_min) / config.slider_step;
        if ticks > MAX_SLIDER_TICKS as f64 {
            bail!(
                "{SLIDER_STEP_VAR} = {} gives {ticks:.0} ticks over [{}, {}]; at most {MAX_SLIDER_TICKS} allowed",
                config.slider_step,
                config.slider_min,
                config.slider_max
            );
        }
        Ok(config)
    }
}

fn parse_kg(key: &str, value: &str) -> Result<f64> {
    let v: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("{key}: '{value}' is not a number"))?;
    if !v.is_finite() {
        bail!("{key}: '{value}' is not finite");
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<DashConfig> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, DashConfig::default());
        assert_eq!(config.data_path, PathBuf::from("spacex_launch_dash.csv"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (DATA_PATH_VAR, "/data/launches.parquet"),
            (SLIDER_MAX_VAR, "16000"),
            (SLIDER_STEP_VAR, " 2000 "),
        ])
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/data/launches.parquet"));
        assert_eq!(config.slider_max, 16_000.0);
        assert_eq!(config.slider_step, 2_000.0);
    }

    #[test]
    fn test_blank_path_keeps_default() {
        let config = config_from(&[(DATA_PATH_VAR, "  ")]).unwrap();
        assert_eq!(config.data_path, PathBuf::from("spacex_launch_dash.csv"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[(SLIDER_MAX_VAR, "lots")]).is_err());
        assert!(config_from(&[(SLIDER_MIN_VAR, "10000")]).is_err());
        assert!(config_from(&[(SLIDER_STEP_VAR, "0")]).is_err());
        assert!(config_from(&[(SLIDER_STEP_VAR, "inf")]).is_err());
    }

    #[test]
    fn test_step_too_fine_rejected() {
        let err = config_from(&[(SLIDER_STEP_VAR, "0.001")]).unwrap_err();
        assert!(err.to_string().contains(SLIDER_STEP_VAR), "{err}");
        assert!(config_from(&[(SLIDER_STEP_VAR, "1e-9")]).is_err());
        assert!(config_from(&[(SLIDER_STEP_VAR, "10")]).is_ok());
        assert!(config_from(&[(SLIDER_STEP_VAR, "9.99")]).is_err());
    }
}
