//! Game configuration

use fs_core::{Credits, FsError, FsResult};
use serde::{Deserialize, Serialize};

use crate::timing::TimingConfig;

/// Nominal forced-win probability for a fresh session
pub const DEFAULT_WIN_RATE: f64 = 0.3;

/// Smallest line bet any configuration may allow
pub const MIN_LINE_BET: u32 = 1;
/// Largest line bet any configuration may allow
pub const MAX_LINE_BET: u32 = 100;

/// Settings-panel credit presets
pub const CREDIT_PRESETS: [Credits; 4] = [1_000, 10_000, 100_000, 1_000_000];

/// Session-wide game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Credits for a new session
    pub starting_credits: Credits,
    /// Line bet for a new session
    pub default_line_bet: u32,
    pub min_line_bet: u32,
    pub max_line_bet: u32,
    /// Initial effective win rate
    pub default_win_rate: f64,
    /// Redraw the effective win rate every N completed spins (cheats off)
    pub drift_interval: u64,
    /// Lower bound of the redrawn win rate
    pub drift_min: f64,
    /// Upper bound of the redrawn win rate
    pub drift_max: f64,
    /// Lifecycle delays
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Standard session with zero-delay timing
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::instant(),
            ..Self::default()
        }
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> FsResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| FsError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> FsResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FsError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> FsResult<String> {
        serde_yml::to_string(self).map_err(|e| FsError::Serialization(e.to_string()))
    }

    /// Reject configurations the state machine cannot run
    pub fn validate(&self) -> FsResult<()> {
        if self.min_line_bet < MIN_LINE_BET
            || self.max_line_bet > MAX_LINE_BET
            || self.min_line_bet > self.max_line_bet
        {
            return Err(FsError::InvalidConfig(format!(
                "line bet range [{}, {}] outside [{}, {}]",
                self.min_line_bet, self.max_line_bet, MIN_LINE_BET, MAX_LINE_BET
            )));
        }
        if !(self.min_line_bet..=self.max_line_bet).contains(&self.default_line_bet) {
            return Err(FsError::InvalidConfig(format!(
                "default line bet {} outside [{}, {}]",
                self.default_line_bet, self.min_line_bet, self.max_line_bet
            )));
        }
        if !(0.0..=1.0).contains(&self.default_win_rate) {
            return Err(FsError::InvalidConfig(format!(
                "default win rate {}",
                self.default_win_rate
            )));
        }
        if self.drift_interval == 0 {
            return Err(FsError::InvalidConfig("drift interval must be positive".into()));
        }
        if !(0.0 <= self.drift_min && self.drift_min <= self.drift_max && self.drift_max <= 1.0) {
            return Err(FsError::InvalidConfig(format!(
                "drift range [{}, {}]",
                self.drift_min, self.drift_max
            )));
        }
        if !self.timing.is_valid() {
            return Err(FsError::InvalidConfig(format!(
                "auto-spin delay {}ms must exceed resolve delay {}ms",
                self.timing.autospin_delay_ms, self.timing.resolve_delay_ms
            )));
        }
        Ok(())
    }

    /// Clamp a requested line bet into the configured range, never past
    /// [`MIN_LINE_BET`, `MAX_LINE_BET`]
    pub fn clamp_line_bet(&self, line_bet: u32) -> u32 {
        let low = self.min_line_bet.clamp(MIN_LINE_BET, MAX_LINE_BET);
        let high = self.max_line_bet.clamp(low, MAX_LINE_BET);
        line_bet.clamp(low, high)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_credits: 1000,
            default_line_bet: 1,
            min_line_bet: MIN_LINE_BET,
            max_line_bet: MAX_LINE_BET,
            default_win_rate: DEFAULT_WIN_RATE,
            drift_interval: 100,
            drift_min: 0.20,
            drift_max: 0.40,
            timing: TimingConfig::default(),
        }
    }
}
