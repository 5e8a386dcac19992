//! Symbol catalog and weighted sampling

use std::fmt;

use fs_core::{FsError, RandomSource};
use serde::{Deserialize, Serialize};

/// A symbol definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Display glyph, also the persisted identity
    pub emoji: &'static str,
    /// Symbol name (e.g., "Cherry", "Star")
    pub name: &'static str,
    /// Line bet multiplier for a full line
    pub payout_multiplier: u32,
    /// Relative draw weight (higher = more common)
    pub weight: u32,
}

impl Symbol {
    const fn new(emoji: &'static str, name: &'static str, payout_multiplier: u32, weight: u32) -> Self {
        Self {
            emoji,
            name,
            payout_multiplier,
            weight,
        }
    }
}

/// The fixed symbol catalog, lowest paying first.
pub const CATALOG: [Symbol; 10] = [
    Symbol::new("🍒", "Cherry", 3, 20),
    Symbol::new("🍋", "Lemon", 4, 15),
    Symbol::new("🍊", "Orange", 5, 12),
    Symbol::new("🍇", "Grapes", 8, 10),
    Symbol::new("🍉", "Watermelon", 10, 8),
    Symbol::new("🔔", "Bell", 15, 6),
    Symbol::new("💎", "Diamond", 20, 4),
    Symbol::new("💰", "Money Bag", 25, 3),
    Symbol::new("7️⃣", "Seven", 50, 2),
    Symbol::new("🌟", "Star", 100, 1),
];

/// Read-only view of the catalog (paytable display, cheat pickers)
pub fn catalog() -> &'static [Symbol] {
    &CATALOG
}

/// Reference to a catalog entry.
///
/// Equality is catalog identity. Serializes as the symbol's emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SymbolId(u8);

impl SymbolId {
    /// Look up by catalog index
    pub fn from_index(index: usize) -> Option<Self> {
        (index < CATALOG.len()).then_some(Self(index as u8))
    }

    /// Look up by emoji
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        CATALOG
            .iter()
            .position(|s| s.emoji == emoji)
            .map(|idx| Self(idx as u8))
    }

    /// Look up by name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        CATALOG
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
            .map(|idx| Self(idx as u8))
    }

    /// Catalog index
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The catalog entry
    pub fn symbol(self) -> &'static Symbol {
        &CATALOG[self.index()]
    }

    pub fn emoji(self) -> &'static str {
        self.symbol().emoji
    }

    pub fn payout_multiplier(self) -> u32 {
        self.symbol().payout_multiplier
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

impl TryFrom<String> for SymbolId {
    type Error = FsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_emoji(&value).ok_or(FsError::UnknownSymbol(value))
    }
}

impl From<SymbolId> for String {
    fn from(id: SymbolId) -> Self {
        id.emoji().to_string()
    }
}

/// The top-tier symbol: highest payout multiplier, wherever it sits in the catalog.
pub fn jackpot_symbol() -> SymbolId {
    let idx = CATALOG
        .iter()
        .enumerate()
        .max_by_key(|(_, s)| s.payout_multiplier)
        .map(|(idx, _)| idx)
        .unwrap_or(CATALOG.len() - 1);
    SymbolId(idx as u8)
}

/// Draws catalog symbols proportionally to their weight.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    total_weight: f64,
}

impl WeightedSampler {
    pub fn new() -> Self {
        Self {
            total_weight: CATALOG.iter().map(|s| s.weight as f64).sum(),
        }
    }

    /// Sum of all catalog weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Expected draw probability for a symbol
    pub fn probability(&self, id: SymbolId) -> f64 {
        id.symbol().weight as f64 / self.total_weight
    }

    /// Draw one symbol
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> SymbolId {
        let mut remaining = rng.next_f64() * self.total_weight;
        for (idx, symbol) in CATALOG.iter().enumerate() {
            remaining -= symbol.weight as f64;
            if remaining <= 0.0 {
                return SymbolId(idx as u8);
            }
        }
        // Only reachable through floating-point drift
        SymbolId(0)
    }
}

impl Default for WeightedSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_core::{RngSource, ScriptedSource};

    #[test]
    fn test_catalog_shape() {
        assert_eq!(catalog().len(), 10);
        assert!(catalog().iter().all(|s| s.weight > 0));
    }

    #[test]
    fn test_jackpot_symbol_is_highest_multiplier() {
        let jackpot = jackpot_symbol();
        assert_eq!(jackpot.symbol().name, "Star");
        assert!(
            catalog()
                .iter()
                .all(|s| s.payout_multiplier <= jackpot.payout_multiplier())
        );
    }

    #[test]
    fn test_symbol_lookup() {
        let cherry = SymbolId::from_emoji("🍒").unwrap();
        assert_eq!(cherry.index(), 0);
        assert_eq!(SymbolId::from_name("money bag").unwrap().emoji(), "💰");
        assert!(SymbolId::from_emoji("🍀").is_none());
        assert!(SymbolId::from_index(10).is_none());
    }

    #[test]
    fn test_symbol_id_serializes_as_emoji() {
        let seven = SymbolId::from_name("Seven").unwrap();
        let json = serde_json::to_string(&seven).unwrap();
        assert_eq!(json, "\"7️⃣\"");

        let back: SymbolId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seven);

        assert!(serde_json::from_str::<SymbolId>("\"🍀\"").is_err());
    }

    #[test]
    fn test_sampler_walks_cumulative_weights() {
        let sampler = WeightedSampler::new();
        assert_eq!(sampler.total_weight(), 81.0);

        // 0.1 * 81 = 8.1 -> Cherry, 0.3 * 81 = 24.3 -> Lemon, 0.999 -> Star
        let mut src = ScriptedSource::new(vec![0.0, 0.1, 0.3, 0.999]);
        assert_eq!(sampler.sample(&mut src).symbol().name, "Cherry");
        assert_eq!(sampler.sample(&mut src).symbol().name, "Cherry");
        assert_eq!(sampler.sample(&mut src).symbol().name, "Lemon");
        assert_eq!(sampler.sample(&mut src).symbol().name, "Star");
    }

    #[test]
    fn test_sampler_frequencies_converge() {
        const DRAWS: usize = 100_000;

        let sampler = WeightedSampler::new();
        let mut rng = RngSource::seeded(0xF00D);
        let mut counts = [0usize; 10];
        for _ in 0..DRAWS {
            counts[sampler.sample(&mut rng).index()] += 1;
        }

        for (idx, count) in counts.iter().enumerate() {
            let id = SymbolId::from_index(idx).unwrap();
            let observed = *count as f64 / DRAWS as f64;
            let expected = sampler.probability(id);
            assert!(
                (observed - expected).abs() < 0.01,
                "{} observed {:.4} expected {:.4}",
                id.symbol().name,
                observed,
                expected
            );
        }
    }
}
