//! Save snapshot
//!
//! The persisted subset of a session. Writing is strict; reading is lenient
//! about counters and defaults but rejects documents missing the balance.

use fs_core::Credits;
use fs_slot_lab::{
    CheatConfig, ForcedRow, GameConfig, GameState, Phase, Settings, Stats, SymbolId,
    total_bet_for,
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{SaveError, SaveResult};

/// Persisted session fields (camelCase on disk). Loading goes through
/// [`SaveSnapshot::from_json`] so lenient coercions apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    pub credits: Credits,
    pub line_bet: u32,
    pub total_bet: Credits,
    pub stats: Stats,
    pub cheats: CheatConfig,
    pub settings: Settings,
    pub current_win_rate: f64,
}

impl SaveSnapshot {
    /// Snapshot an idle session. Returns `None` while a round is in flight.
    pub fn capture(state: &GameState) -> Option<Self> {
        if state.is_busy() {
            return None;
        }
        let mut stats = state.stats.clone();
        stats.has_cheated |= state.cheats.enabled;
        Some(Self {
            credits: state.credits,
            line_bet: state.line_bet,
            total_bet: state.total_bet,
            stats,
            cheats: state.cheats.clone(),
            settings: state.settings.clone(),
            current_win_rate: state.current_win_rate,
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> SaveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and normalize a save document
    pub fn from_json(json: &str, config: &GameConfig) -> SaveResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value, config)
    }

    /// Normalize an already-parsed document
    pub fn from_value(value: &Value, config: &GameConfig) -> SaveResult<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| SaveError::Invalid("save data is not an object".into()))?;

        let credits = required_amount(root, "credits")?;
        let line_bet = required_amount(root, "lineBet")?;
        let line_bet = config.clamp_line_bet(u32::try_from(line_bet).unwrap_or(u32::MAX));

        let cheats = match root.get("cheats").and_then(Value::as_object) {
            Some(cheats) => parse_cheats(cheats, config)?,
            None => CheatConfig::new(config.default_win_rate),
        };

        let mut stats = root
            .get("stats")
            .and_then(Value::as_object)
            .map(parse_stats)
            .unwrap_or_default();
        stats.has_cheated |= cheats.enabled;

        let settings = root
            .get("settings")
            .and_then(Value::as_object)
            .map(parse_settings)
            .unwrap_or_default();

        let current_win_rate = root
            .get("currentWinRate")
            .and_then(Value::as_f64)
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 1.0))
            .unwrap_or(config.default_win_rate);

        Ok(Self {
            credits,
            line_bet,
            total_bet: total_bet_for(line_bet),
            stats,
            cheats,
            settings,
            current_win_rate,
        })
    }

    /// Rebuild an idle session. Transient fields start empty.
    pub fn into_state(self, config: &GameConfig) -> GameState {
        let mut state = GameState::new(config);
        state.credits = self.credits;
        state.set_line_bet(config.clamp_line_bet(self.line_bet));
        state.stats = self.stats;
        state.cheats = self.cheats;
        state.settings = self.settings.normalized();
        state.current_win_rate = self.current_win_rate;
        state.phase = Phase::Idle;
        state
    }
}

fn required_amount(root: &Map<String, Value>, key: &str) -> SaveResult<u64> {
    let value = root
        .get(key)
        .ok_or_else(|| SaveError::Invalid(format!("missing {key}")))?;
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.trunc() as u64)
            })
            .ok_or_else(|| SaveError::Invalid(format!("{key} must be a non-negative number"))),
        _ => Err(SaveError::Invalid(format!("{key} must be a number"))),
    }
}

/// Numbers and numeric strings; anything else reads as 0
fn lenient_count(value: Option<&Value>) -> u64 {
    let as_float = match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return v;
            }
            n.as_f64()
        }
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    as_float
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.trunc() as u64)
        .unwrap_or(0)
}

fn parse_stats(stats: &Map<String, Value>) -> Stats {
    Stats {
        total_spins: lenient_count(stats.get("totalSpins")),
        total_wins: lenient_count(stats.get("totalWins")),
        total_losses: lenient_count(stats.get("totalLosses")),
        biggest_win: lenient_count(stats.get("biggestWin")),
        total_won: lenient_count(stats.get("totalWon")),
        total_lost: lenient_count(stats.get("totalLost")),
        has_cheated: stats
            .get("hasCheated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn parse_cheats(cheats: &Map<String, Value>, config: &GameConfig) -> SaveResult<CheatConfig> {
    let mut parsed = CheatConfig::new(config.default_win_rate);
    parsed.enabled = cheats
        .get("enabled")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if let Some(rate) = cheats
        .get("winRate")
        .and_then(Value::as_f64)
        .filter(|r| r.is_finite())
    {
        parsed.win_rate = rate.clamp(0.0, 1.0);
    }
    parsed.always_jackpot = cheats
        .get("alwaysJackpot")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    parsed.force_symbols = match cheats.get("forceSymbols") {
        None | Some(Value::Null) => None,
        Some(Value::Array(slots)) => parse_forced_row(slots)?,
        Some(other) => {
            return Err(SaveError::Invalid(format!(
                "forceSymbols must be a list, got {other}"
            )));
        }
    };
    Ok(parsed)
}

fn parse_forced_row(slots: &[Value]) -> SaveResult<Option<ForcedRow>> {
    let slots = slots
        .iter()
        .map(|slot| match slot {
            Value::Null => Ok(None),
            Value::String(emoji) => SymbolId::from_emoji(emoji)
                .map(Some)
                .ok_or_else(|| SaveError::Invalid(format!("unknown symbol {emoji:?}"))),
            other => Err(SaveError::Invalid(format!("bad forced symbol {other}"))),
        })
        .collect::<SaveResult<Vec<_>>>()?;
    let row = ForcedRow::new(slots).map_err(|e| SaveError::Invalid(e.to_string()))?;
    Ok((!row.is_empty()).then_some(row))
}

fn parse_settings(settings: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    Settings {
        sound_enabled: settings
            .get("soundEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.sound_enabled),
        volume: settings
            .get("volume")
            .and_then(Value::as_f64)
            .unwrap_or(defaults.volume),
    }
    .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_capture_skipped_while_spinning() {
        let mut state = GameState::default();
        state.phase = Phase::Spinning;
        assert!(SaveSnapshot::capture(&state).is_none());
        state.phase = Phase::Settling;
        assert!(SaveSnapshot::capture(&state).is_none());
    }

    #[test]
    fn test_capture_folds_enabled_into_has_cheated() {
        let mut state = GameState::default();
        state.cheats.enabled = true;
        let snapshot = SaveSnapshot::capture(&state).unwrap();
        assert!(snapshot.stats.has_cheated);
    }

    #[test]
    fn test_json_uses_camel_case_and_omits_transient_fields() {
        let snapshot = SaveSnapshot::capture(&GameState::default()).unwrap();
        let value: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        for key in ["credits", "lineBet", "totalBet", "stats", "cheats", "settings", "currentWinRate"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        for key in ["phase", "spinning", "reels", "activePaylines", "autoSpin", "lastWin"] {
            assert!(value.get(key).is_none(), "unexpected {key}");
        }
        assert_eq!(value["cheats"]["forceSymbols"], Value::Null);
    }

    #[test]
    fn test_lenient_counters() {
        let doc = json!({
            "credits": 250,
            "lineBet": 2,
            "stats": { "totalSpins": "12", "totalWins": 4.0, "biggestWin": "lots" }
        });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert_eq!(snapshot.stats.total_spins, 12);
        assert_eq!(snapshot.stats.total_wins, 4);
        assert_eq!(snapshot.stats.biggest_win, 0);
        assert_eq!(snapshot.stats.total_lost, 0);
        assert_eq!(snapshot.total_bet, 10);
        assert_eq!(snapshot.current_win_rate, 0.3);
        assert_eq!(snapshot.cheats, CheatConfig::default());
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_balance_must_be_numeric() {
        let doc = json!({ "credits": "1000", "lineBet": 1 });
        assert!(matches!(
            SaveSnapshot::from_value(&doc, &config()),
            Err(SaveError::Invalid(_))
        ));

        let doc = json!({ "credits": 1000 });
        assert!(SaveSnapshot::from_value(&doc, &config()).is_err());

        assert!(SaveSnapshot::from_value(&json!([1, 2]), &config()).is_err());
    }

    #[test]
    fn test_line_bet_clamped_and_total_recomputed() {
        let doc = json!({ "credits": 10, "lineBet": 0, "totalBet": 999 });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert_eq!(snapshot.line_bet, 1);
        assert_eq!(snapshot.total_bet, 5);

        let doc = json!({ "credits": 10, "lineBet": 4000 });
        assert_eq!(SaveSnapshot::from_value(&doc, &config()).unwrap().line_bet, 100);
    }

    #[test]
    fn test_enabled_cheats_mark_has_cheated() {
        let doc = json!({
            "credits": 10,
            "lineBet": 1,
            "stats": { "hasCheated": false },
            "cheats": { "enabled": true, "winRate": 0.8, "forceSymbols": null, "alwaysJackpot": false }
        });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert!(snapshot.stats.has_cheated);
        assert_eq!(snapshot.cheats.win_rate, 0.8);
    }

    #[test]
    fn test_forced_symbols_parsed_with_holes() {
        let doc = json!({
            "credits": 10,
            "lineBet": 1,
            "cheats": { "enabled": true, "forceSymbols": ["7️⃣", null, "🍒"] }
        });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        let row = snapshot.cheats.force_symbols.unwrap();
        assert_eq!(row.get(0), SymbolId::from_name("Seven"));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), SymbolId::from_name("Cherry"));
    }

    #[test]
    fn test_unknown_forced_symbol_rejected() {
        let doc = json!({
            "credits": 10,
            "lineBet": 1,
            "cheats": { "forceSymbols": ["🍌", null, null] }
        });
        assert!(matches!(
            SaveSnapshot::from_value(&doc, &config()),
            Err(SaveError::Invalid(_))
        ));
    }

    #[test]
    fn test_win_rate_clamped() {
        let doc = json!({ "credits": 10, "lineBet": 1, "currentWinRate": 7.5 });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert_eq!(snapshot.current_win_rate, 1.0);
    }

    #[test]
    fn test_zero_win_rate_kept() {
        let doc = json!({ "credits": 10, "lineBet": 1, "currentWinRate": 0.0 });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert_eq!(snapshot.current_win_rate, 0.0);

        let doc = json!({ "credits": 10, "lineBet": 1, "currentWinRate": "high" });
        let snapshot = SaveSnapshot::from_value(&doc, &config()).unwrap();
        assert_eq!(snapshot.current_win_rate, config().default_win_rate);
    }

    #[test]
    fn test_round_trip_forces_idle() {
        let mut state = GameState::default();
        state.credits = 777;
        state.set_line_bet(3);
        state.stats.record_round(45, 15);
        state.cheats.force_symbols =
            ForcedRow::new(vec![None, SymbolId::from_name("Bell"), None]).ok();
        state.current_win_rate = 0.25;
        state.last_win = 45;
        state.active_paylines = vec![1];

        let json = SaveSnapshot::capture(&state).unwrap().to_json().unwrap();
        let restored = SaveSnapshot::from_json(&json, &config())
            .unwrap()
            .into_state(&config());

        assert_eq!(restored.phase, Phase::Idle);
        assert_eq!(restored.credits, 777);
        assert_eq!(restored.total_bet, 15);
        assert_eq!(restored.stats, state.stats);
        assert_eq!(restored.cheats, state.cheats);
        assert_eq!(restored.current_win_rate, 0.25);
        assert_eq!(restored.last_win, 0);
        assert!(restored.active_paylines.is_empty());
    }
}
