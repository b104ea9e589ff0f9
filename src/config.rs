use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::Result;

use crate::{
    annotate::MarkLayout,
    constants::{
        DEFAULT_MARK_OFFSET_X, DEFAULT_MARK_OFFSET_Y, DEFAULT_OCR_TIMEOUT_SECS, DEFAULT_PSM,
    },
    normalize::ConfusionTable,
};

/// Settings for invoking the tesseract binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractEnv {
    /// Program name or path.
    program: String,
    /// Page segmentation mode passed as `--psm`.
    psm:     u8,
    /// How long recognition may run.
    timeout: Duration,
}

impl TesseractEnv {
    /// Creates a tesseract configuration.
    pub fn new(program: impl Into<String>, psm: u8, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            psm,
            timeout,
        }
    }

    /// Reads `SHEETGRADE_TESSERACT`, `SHEETGRADE_PSM` and
    /// `SHEETGRADE_OCR_TIMEOUT_SECS`.
    fn from_env() -> Self {
        let program = std::env::var("SHEETGRADE_TESSERACT")
            .map(|value| value.trim().to_owned())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "tesseract".to_string());
        let psm = read_parsed("SHEETGRADE_PSM", DEFAULT_PSM);
        let timeout = read_timeout_secs("SHEETGRADE_OCR_TIMEOUT_SECS", DEFAULT_OCR_TIMEOUT_SECS);
        Self::new(program, psm, timeout)
    }

    /// Returns the program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the page segmentation mode.
    pub fn psm(&self) -> u8 {
        self.psm
    }

    /// Returns the recognition timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TesseractEnv {
    fn default() -> Self {
        Self::new("tesseract", DEFAULT_PSM, Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS))
    }
}

/// Runtime configuration shared across the crate.
#[derive(Debug, Clone)]
pub struct ConfigState {
    /// Recognition settings.
    tesseract:   TesseractEnv,
    /// Mark placement for annotations.
    mark_layout: MarkLayout,
    /// Substitutions applied before splitting.
    confusions:  ConfusionTable,
}

impl ConfigState {
    /// Construct a new configuration instance from the environment.
    fn new() -> Result<Self> {
        let mark_layout = MarkLayout {
            offset_x: read_parsed("SHEETGRADE_MARK_OFFSET_X", DEFAULT_MARK_OFFSET_X),
            offset_y: read_parsed("SHEETGRADE_MARK_OFFSET_Y", DEFAULT_MARK_OFFSET_Y),
        };

        let confusions = match std::env::var("SHEETGRADE_CONFUSIONS") {
            Ok(value) if !value.trim().is_empty() => value.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring SHEETGRADE_CONFUSIONS: {e}");
                ConfusionTable::default()
            }),
            _ => ConfusionTable::default(),
        };

        Ok(Self {
            tesseract: TesseractEnv::from_env(),
            mark_layout,
            confusions,
        })
    }

    /// Returns the tesseract settings.
    pub fn tesseract(&self) -> &TesseractEnv {
        &self.tesseract
    }

    /// Returns the mark layout.
    pub fn mark_layout(&self) -> MarkLayout {
        self.mark_layout
    }

    /// Returns the confusion table.
    pub fn confusions(&self) -> &ConfusionTable {
        &self.confusions
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let mut guard = slot().lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = Arc::new(ConfigState::new()?);
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Reads and parses an environment variable, falling back to `default`.
fn read_parsed<T: std::str::FromStr>(env: &str, default: T) -> T {
    std::env::var(env)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Reads a whole number of seconds from the environment.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    Duration::from_secs(read_parsed(env, default_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_use_defaults() {
        assert_eq!(read_parsed("SHEETGRADE_TEST_UNSET_VARIABLE", 7u8), 7);
        assert_eq!(
            read_timeout_secs("SHEETGRADE_TEST_UNSET_VARIABLE", 3),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn default_tesseract_settings() {
        let env = TesseractEnv::default();
        assert_eq!(env.program(), "tesseract");
        assert_eq!(env.psm(), 5);
        assert_eq!(env.timeout(), Duration::from_secs(60));
    }
}
