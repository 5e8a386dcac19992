//! Session statistics and win tiers

use fs_core::Credits;
use serde::{Deserialize, Serialize};

/// Accumulating session counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_spins: u64,
    pub total_wins: u64,
    pub total_losses: u64,
    pub biggest_win: Credits,
    /// Sum of all payouts
    pub total_won: Credits,
    /// Sum of total bets on rounds that paid nothing
    pub total_lost: Credits,
    /// Sticky until an explicit reset
    pub has_cheated: bool,
}

impl Stats {
    /// Record one completed round. A zero payout counts as a loss.
    pub fn record_round(&mut self, payout: Credits, total_bet: Credits) {
        self.total_spins += 1;
        if payout > 0 {
            self.total_wins += 1;
            self.total_won = self.total_won.saturating_add(payout);
        } else {
            self.total_losses += 1;
            self.total_lost = self.total_lost.saturating_add(total_bet);
        }
        self.biggest_win = self.biggest_win.max(payout);
    }

    /// Rounded percentage of winning spins
    pub fn win_percentage(&self) -> u64 {
        if self.total_spins == 0 {
            return 0;
        }
        ((self.total_wins as f64 / self.total_spins as f64) * 100.0).round() as u64
    }

    /// Payouts minus the stake of losing rounds
    pub fn net(&self) -> i128 {
        self.total_won as i128 - self.total_lost as i128
    }
}

/// Presentation tier for a round's payout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    NoWin,
    Win,
    BigWin,
    MegaWin,
    Jackpot,
}

impl WinTier {
    pub fn classify(amount: Credits) -> Self {
        match amount {
            0 => Self::NoWin,
            1..=9 => Self::Win,
            10..=49 => Self::BigWin,
            50..=99 => Self::MegaWin,
            _ => Self::Jackpot,
        }
    }

    /// Banner text
    pub fn label(self) -> &'static str {
        match self {
            Self::NoWin => "no win",
            Self::Win => "win!",
            Self::BigWin => "big win!",
            Self::MegaWin => "mega win!",
            Self::Jackpot => "jackpot!!!",
        }
    }
}
