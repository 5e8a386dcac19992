//! Cheat overrides for demo and testing payouts

use fs_core::{FsError, FsResult};
use serde::{Deserialize, Serialize};

use crate::reels::{COLS, SpinParams};
use crate::symbols::SymbolId;

/// Middle-row overrides, positional, with holes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<SymbolId>>", into = "Vec<Option<SymbolId>>")]
pub struct ForcedRow {
    slots: Vec<Option<SymbolId>>,
}

impl ForcedRow {
    /// At most one slot per column
    pub fn new(slots: Vec<Option<SymbolId>>) -> FsResult<Self> {
        if slots.len() > COLS {
            return Err(FsError::InvalidParam(format!(
                "{} forced symbols for {} columns",
                slots.len(),
                COLS
            )));
        }
        Ok(Self { slots })
    }

    /// Override for a column, if any
    pub fn get(&self, col: usize) -> Option<SymbolId> {
        self.slots.get(col).copied().flatten()
    }

    /// True when every slot is a hole
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Option<SymbolId>] {
        &self.slots
    }
}

impl TryFrom<Vec<Option<SymbolId>>> for ForcedRow {
    type Error = FsError;

    fn try_from(slots: Vec<Option<SymbolId>>) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<ForcedRow> for Vec<Option<SymbolId>> {
    fn from(row: ForcedRow) -> Self {
        row.slots
    }
}

/// Cheat configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheatConfig {
    /// Master switch; overrides only reach the reels while enabled
    pub enabled: bool,
    /// Forced-win probability in [0, 1]
    pub win_rate: f64,
    /// Middle-row overrides
    pub force_symbols: Option<ForcedRow>,
    /// Fill every cell with the jackpot symbol
    pub always_jackpot: bool,
}

impl CheatConfig {
    pub fn new(default_win_rate: f64) -> Self {
        Self {
            enabled: false,
            win_rate: default_win_rate.clamp(0.0, 1.0),
            force_symbols: None,
            always_jackpot: false,
        }
    }

    /// Apply one update. Returns true if a cheat is now engaged because of it.
    pub fn apply(&mut self, action: CheatAction) -> bool {
        match action {
            CheatAction::SetWinRate(rate) => {
                self.win_rate = if rate.is_finite() {
                    rate.clamp(0.0, 1.0)
                } else {
                    self.win_rate
                };
                self.enabled
            }
            CheatAction::SetForceSymbols(row) => {
                self.force_symbols = row.filter(|r| !r.is_empty());
                self.enabled && self.force_symbols.is_some()
            }
            CheatAction::SetAlwaysJackpot(on) => {
                self.always_jackpot = on;
                self.enabled && on
            }
            CheatAction::ToggleEnabled => {
                self.enabled = !self.enabled;
                self.enabled
            }
        }
    }

    /// Reel parameters for the next spin.
    ///
    /// With cheats off the generator sees only the session's effective win rate.
    pub fn spin_params(&self, current_win_rate: f64) -> SpinParams<'_> {
        if !self.enabled {
            return SpinParams::natural(current_win_rate);
        }
        SpinParams {
            win_rate: self.win_rate,
            force_symbols: self.force_symbols.as_ref(),
            always_jackpot: self.always_jackpot,
        }
    }
}

impl Default for CheatConfig {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WIN_RATE)
    }
}

/// A single cheat update
#[derive(Debug, Clone, PartialEq)]
pub enum CheatAction {
    SetWinRate(f64),
    SetForceSymbols(Option<ForcedRow>),
    SetAlwaysJackpot(bool),
    ToggleEnabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> SymbolId {
        SymbolId::from_name(name).unwrap()
    }

    #[test]
    fn test_forced_row_rejects_extra_columns() {
        assert!(ForcedRow::new(vec![None; 4]).is_err());
        assert!(ForcedRow::new(vec![None; 3]).unwrap().is_empty());
    }

    #[test]
    fn test_forced_row_serializes_positionally() {
        let row = ForcedRow::new(vec![Some(sym("Cherry")), None, Some(sym("Star"))]).unwrap();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["🍒",null,"🌟"]"#);

        let back: ForcedRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(2), Some(sym("Star")));
        assert_eq!(back.get(1), None);
    }

    #[test]
    fn test_all_holes_clears_override() {
        let mut cheats = CheatConfig::default();
        cheats.apply(CheatAction::ToggleEnabled);
        let engaged = cheats.apply(CheatAction::SetForceSymbols(Some(
            ForcedRow::new(vec![None, None, None]).unwrap(),
        )));
        assert!(!engaged);
        assert!(cheats.force_symbols.is_none());
    }

    #[test]
    fn test_win_rate_is_clamped() {
        let mut cheats = CheatConfig::default();
        cheats.apply(CheatAction::SetWinRate(1.7));
        assert_eq!(cheats.win_rate, 1.0);
        cheats.apply(CheatAction::SetWinRate(-0.2));
        assert_eq!(cheats.win_rate, 0.0);
        cheats.apply(CheatAction::SetWinRate(f64::NAN));
        assert_eq!(cheats.win_rate, 0.0);
    }

    #[test]
    fn test_disabled_cheats_do_not_reach_reels() {
        let mut cheats = CheatConfig::default();
        cheats.apply(CheatAction::SetAlwaysJackpot(true));
        cheats.apply(CheatAction::SetWinRate(1.0));

        let params = cheats.spin_params(0.25);
        assert!(!params.always_jackpot);
        assert_eq!(params.win_rate, 0.25);

        assert!(cheats.apply(CheatAction::ToggleEnabled));
        let params = cheats.spin_params(0.25);
        assert!(params.always_jackpot);
        assert_eq!(params.win_rate, 1.0);
    }
}
