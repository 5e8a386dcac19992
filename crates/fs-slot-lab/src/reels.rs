//! Reel grid and the reel-generation policy

use std::fmt;

use fs_core::RandomSource;
use serde::{Deserialize, Serialize};

use crate::cheats::ForcedRow;
use crate::paytable::{Payline, standard_paylines};
use crate::symbols::{CATALOG, SymbolId, WeightedSampler, jackpot_symbol};

/// Standard grid height
pub const ROWS: usize = 3;
/// Standard grid width
pub const COLS: usize = 3;

/// Row-major symbol matrix (`cells[row][col]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Vec<SymbolId>>,
}

impl Grid {
    /// Every cell set to one symbol
    pub fn filled(rows: usize, cols: usize, symbol: SymbolId) -> Self {
        Self {
            cells: vec![vec![symbol; cols]; rows],
        }
    }

    /// Build from explicit rows. All rows must have equal width.
    pub fn from_rows(cells: Vec<Vec<SymbolId>>) -> Self {
        debug_assert!(
            cells.windows(2).all(|w| w[0].len() == w[1].len()),
            "ragged grid"
        );
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// Symbol at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<SymbolId> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite a cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize, symbol: SymbolId) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = symbol;
        }
    }

    pub fn row(&self, row: usize) -> Option<&[SymbolId]> {
        self.cells.get(row).map(Vec::as_slice)
    }

    /// All cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.cells.iter().flatten().copied()
    }

    /// Overwrite every cell on a payline
    pub fn paint_line(&mut self, payline: &Payline, symbol: SymbolId) {
        for (row, col) in payline.cells() {
            self.set(row, col, symbol);
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, row) in self.cells.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let line: Vec<&str> = row.iter().map(|s| s.emoji()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Per-spin inputs to the reel generator
#[derive(Debug, Clone, Copy)]
pub struct SpinParams<'a> {
    /// Probability of forcing a line win
    pub win_rate: f64,
    /// Middle-row overrides
    pub force_symbols: Option<&'a ForcedRow>,
    /// Fill the whole grid with the jackpot symbol
    pub always_jackpot: bool,
}

impl SpinParams<'_> {
    /// Unforced spin at the given win rate
    pub fn natural(win_rate: f64) -> Self {
        Self {
            win_rate,
            force_symbols: None,
            always_jackpot: false,
        }
    }
}

/// Which branch of the generation policy produced a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReelMode {
    Jackpot,
    ForcedSymbols,
    ForcedWin { payline: usize },
    Natural,
}

/// Produces grids, applying cheat overrides before falling back to sampling.
#[derive(Debug, Clone)]
pub struct ReelGenerator {
    rows: usize,
    cols: usize,
    sampler: WeightedSampler,
    paylines: Vec<Payline>,
}

impl ReelGenerator {
    /// 3×3 generator over the standard paylines
    pub fn new() -> Self {
        Self::with_shape(ROWS, COLS, standard_paylines())
    }

    pub fn with_shape(rows: usize, cols: usize, paylines: Vec<Payline>) -> Self {
        Self {
            rows,
            cols,
            sampler: WeightedSampler::new(),
            paylines,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Generate a grid
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R, params: SpinParams<'_>) -> Grid {
        self.generate_with_mode(rng, params).0
    }

    /// Generate a grid and report which policy branch was taken.
    ///
    /// Branches are exclusive: jackpot, then forced symbols, then the win-rate
    /// draw. The draw order (win roll, cells row-major, payline, symbol) is fixed.
    pub fn generate_with_mode<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        params: SpinParams<'_>,
    ) -> (Grid, ReelMode) {
        if params.always_jackpot {
            return (
                Grid::filled(self.rows, self.cols, jackpot_symbol()),
                ReelMode::Jackpot,
            );
        }

        if let Some(forced) = params.force_symbols.filter(|f| !f.is_empty()) {
            let mut grid = self.sample_grid(rng);
            let middle = self.rows / 2;
            for col in 0..self.cols {
                if let Some(symbol) = forced.get(col) {
                    grid.set(middle, col, symbol);
                }
            }
            return (grid, ReelMode::ForcedSymbols);
        }

        let should_win = rng.chance(params.win_rate);
        let mut grid = self.sample_grid(rng);
        if should_win && !self.paylines.is_empty() {
            let payline = rng.next_index(self.paylines.len());
            let symbol = SymbolId::from_index(rng.next_index(CATALOG.len()))
                .unwrap_or_else(jackpot_symbol);
            grid.paint_line(&self.paylines[payline], symbol);
            return (grid, ReelMode::ForcedWin { payline });
        }

        (grid, ReelMode::Natural)
    }

    fn sample_grid<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Grid {
        let cells = (0..self.rows)
            .map(|_| (0..self.cols).map(|_| self.sampler.sample(rng)).collect())
            .collect();
        Grid::from_rows(cells)
    }
}

impl Default for ReelGenerator {
    fn default() -> Self {
        Self::new()
    }
}
