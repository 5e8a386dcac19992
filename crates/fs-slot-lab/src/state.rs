//! Session state owned by the slot machine

use fs_core::Credits;
use serde::{Deserialize, Serialize};

use crate::cheats::CheatConfig;
use crate::config::GameConfig;
use crate::paytable::PAYLINE_COUNT;
use crate::reels::Grid;
use crate::stats::{Stats, WinTier};

/// Spin lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    /// Bet debited, reels turning
    Spinning,
    /// Outcome being applied
    Settling,
}

/// Presentation settings, opaque to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sound_enabled: bool,
    /// 0.0 - 1.0
    pub volume: f64,
}

impl Settings {
    /// Clamp volume into range
    pub fn normalized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            Self::default().volume
        };
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 0.5,
        }
    }
}

/// Everything the machine tracks between rounds
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub credits: Credits,
    pub line_bet: u32,
    /// Always `line_bet * PAYLINE_COUNT`
    pub total_bet: Credits,
    pub phase: Phase,
    /// Payout of the last settled round
    pub last_win: Credits,
    /// Winning line indices of the last settled round
    pub active_paylines: Vec<usize>,
    pub auto_spin: bool,
    pub stats: Stats,
    pub cheats: CheatConfig,
    pub settings: Settings,
    /// Effective win rate while cheats are off
    pub current_win_rate: f64,
    /// Last generated grid
    pub reels: Option<Grid>,
}

impl GameState {
    /// Fresh session
    pub fn new(config: &GameConfig) -> Self {
        let line_bet = config.clamp_line_bet(config.default_line_bet);
        Self {
            credits: config.starting_credits,
            line_bet,
            total_bet: total_bet_for(line_bet),
            phase: Phase::Idle,
            last_win: 0,
            active_paylines: Vec::new(),
            auto_spin: false,
            stats: Stats::default(),
            cheats: CheatConfig::new(config.default_win_rate),
            settings: Settings::default(),
            current_win_rate: config.default_win_rate,
            reels: None,
        }
    }

    /// A round is in flight
    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn can_afford_spin(&self) -> bool {
        self.credits >= self.total_bet
    }

    /// Set the line bet and keep `total_bet` in sync
    pub fn set_line_bet(&mut self, line_bet: u32) {
        self.line_bet = line_bet;
        self.total_bet = total_bet_for(line_bet);
    }

    /// Tier of the last settled round
    pub fn win_tier(&self) -> WinTier {
        WinTier::classify(self.last_win)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

/// Total stake for a line bet across every payline
pub fn total_bet_for(line_bet: u32) -> Credits {
    Credits::from(line_bet) * PAYLINE_COUNT as Credits
}
