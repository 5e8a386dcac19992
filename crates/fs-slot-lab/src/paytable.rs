//! Paylines and win calculation

use fs_core::Credits;
use serde::{Deserialize, Serialize};

use crate::reels::Grid;
use crate::symbols::SymbolId;

/// Number of paylines on the standard 3×3 machine
pub const PAYLINE_COUNT: usize = 5;

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row position for each column (e.g., [0, 1, 2] for the falling diagonal)
    pub positions: Vec<u8>,
}

impl Payline {
    /// Create a straight line (same row across all columns)
    pub fn straight(index: u8, row: u8, cols: u8) -> Self {
        Self {
            index,
            positions: vec![row; cols as usize],
        }
    }

    /// Top-left to bottom-right
    pub fn diagonal_down(index: u8, size: u8) -> Self {
        Self {
            index,
            positions: (0..size).collect(),
        }
    }

    /// Bottom-left to top-right
    pub fn diagonal_up(index: u8, size: u8) -> Self {
        Self {
            index,
            positions: (0..size).rev().collect(),
        }
    }

    /// (row, col) cells covered by this line
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.positions
            .iter()
            .enumerate()
            .map(|(col, &row)| (row as usize, col))
    }
}

/// Top, middle, bottom, then both diagonals
pub fn standard_paylines() -> Vec<Payline> {
    vec![
        Payline::straight(0, 0, 3),
        Payline::straight(1, 1, 3),
        Payline::straight(2, 2, 3),
        Payline::diagonal_down(3, 3),
        Payline::diagonal_up(4, 3),
    ]
}

/// A win on a single payline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWin {
    /// Position of the payline in the evaluated set
    pub line_index: usize,
    /// Winning symbol
    pub symbol: SymbolId,
    /// Number of matching symbols
    pub match_count: u8,
    /// multiplier × line bet
    pub payout: Credits,
    /// Cells of the winning line (row, col)
    pub positions: Vec<(u8, u8)>,
}

/// Result of evaluating a grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Line wins, in payline order
    pub line_wins: Vec<LineWin>,
    /// Sum of all line payouts
    pub total_payout: Credits,
}

impl Evaluation {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.total_payout > 0
    }

    /// Indices of the winning paylines
    pub fn winning_lines(&self) -> Vec<usize> {
        self.line_wins.iter().map(|w| w.line_index).collect()
    }
}

/// Length of the matching run starting at column 0, and its anchor symbol.
///
/// Returns `None` when the payline does not fit the grid.
pub fn line_run(grid: &Grid, payline: &Payline) -> Option<(SymbolId, u8)> {
    if payline.positions.len() != grid.cols() {
        debug_assert!(
            false,
            "payline {} has {} positions for a {}-column grid",
            payline.index,
            payline.positions.len(),
            grid.cols()
        );
        return None;
    }

    let mut symbols = payline.cells().map(|(row, col)| grid.get(row, col));
    let anchor = match symbols.next().flatten() {
        Some(anchor) => anchor,
        None => {
            debug_assert!(false, "payline {} leaves the grid", payline.index);
            return None;
        }
    };

    let mut match_count = 1u8;
    for symbol in symbols {
        match symbol {
            Some(symbol) if symbol == anchor => match_count += 1,
            Some(_) => break,
            None => {
                debug_assert!(false, "payline {} leaves the grid", payline.index);
                return None;
            }
        }
    }

    Some((anchor, match_count))
}

/// Evaluate every payline against a grid.
///
/// A line pays only when every column matches the symbol in column 0.
pub fn evaluate_paylines(grid: &Grid, paylines: &[Payline], line_bet: u32) -> Evaluation {
    let mut line_wins = Vec::new();

    for (line_index, payline) in paylines.iter().enumerate() {
        let Some((symbol, match_count)) = line_run(grid, payline) else {
            continue;
        };
        if (match_count as usize) < grid.cols() {
            continue;
        }

        line_wins.push(LineWin {
            line_index,
            symbol,
            match_count,
            payout: symbol.payout_multiplier() as Credits * line_bet as Credits,
            positions: payline
                .cells()
                .map(|(row, col)| (row as u8, col as u8))
                .collect(),
        });
    }

    let total_payout = line_wins.iter().map(|w| w.payout).sum();
    Evaluation {
        line_wins,
        total_payout,
    }
}

/// Payline set plus bet arithmetic
#[derive(Debug, Clone)]
pub struct PayTable {
    /// Payline definitions
    pub paylines: Vec<Payline>,
}

impl PayTable {
    /// Create the standard five-line paytable
    pub fn standard() -> Self {
        Self {
            paylines: standard_paylines(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.paylines.len()
    }

    /// Total wager for a line bet
    pub fn total_bet(&self, line_bet: u32) -> Credits {
        line_bet as Credits * self.line_count() as Credits
    }

    /// Evaluate wins on a grid
    pub fn evaluate(&self, grid: &Grid, line_bet: u32) -> Evaluation {
        evaluate_paylines(grid, &self.paylines, line_bet)
    }
}

impl Default for PayTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(name: &str) -> SymbolId {
        SymbolId::from_name(name).unwrap()
    }

    #[test]
    fn test_standard_paylines() {
        let lines = standard_paylines();
        assert_eq!(lines.len(), PAYLINE_COUNT);
        assert_eq!(lines[0].positions, vec![0, 0, 0]);
        assert_eq!(lines[3].positions, vec![0, 1, 2]);
        assert_eq!(lines[4].positions, vec![2, 1, 0]);
    }

    #[test]
    fn test_three_rows_pay_independently() {
        let (x, y, z) = (sym("Cherry"), sym("Lemon"), sym("Orange"));
        let grid = Grid::from_rows(vec![vec![x, x, x], vec![y, y, y], vec![z, z, z]]);

        let eval = PayTable::standard().evaluate(&grid, 1);
        assert_eq!(eval.winning_lines(), vec![0, 1, 2]);
        assert_eq!(eval.total_payout, 3 + 4 + 5);
    }

    #[test]
    fn test_partial_run_never_pays() {
        let (a, b, c) = (sym("Star"), sym("Bell"), sym("Grapes"));
        let grid = Grid::from_rows(vec![vec![a, a, b], vec![c, b, a], vec![b, c, c]]);

        assert_eq!(line_run(&grid, &Payline::straight(0, 0, 3)), Some((a, 2)));
        let eval = evaluate_paylines(&grid, &[Payline::straight(0, 0, 3)], 10);
        assert!(!eval.is_win());
        assert_eq!(eval.total_payout, 0);
    }

    #[test]
    fn test_run_must_start_at_first_column() {
        let (a, b) = (sym("Diamond"), sym("Cherry"));
        let grid = Grid::from_rows(vec![vec![b, a, a], vec![b, b, a], vec![a, a, b]]);

        let eval = evaluate_paylines(&grid, &[Payline::straight(0, 0, 3)], 1);
        assert!(eval.line_wins.is_empty());
    }

    #[test]
    fn test_overlapping_lines_all_pay() {
        let star = sym("Star");
        let grid = Grid::filled(3, 3, star);

        let eval = PayTable::standard().evaluate(&grid, 2);
        assert_eq!(eval.winning_lines(), vec![0, 1, 2, 3, 4]);
        assert_eq!(eval.total_payout, 5 * 100 * 2);
    }

    #[test]
    fn test_winning_lines_follow_caller_order() {
        let cherry = sym("Cherry");
        let lemon = sym("Lemon");
        let grid = Grid::from_rows(vec![
            vec![cherry, lemon, lemon],
            vec![lemon, cherry, lemon],
            vec![lemon, lemon, cherry],
        ]);

        let lines = vec![Payline::diagonal_down(3, 3), Payline::straight(0, 0, 3)];
        let eval = evaluate_paylines(&grid, &lines, 4);
        assert_eq!(eval.winning_lines(), vec![0]);
        assert_eq!(eval.line_wins[0].positions, vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(eval.total_payout, 12);
    }

    #[test]
    fn test_total_bet_scales_with_lines() {
        let table = PayTable::standard();
        assert_eq!(table.total_bet(1), 5);
        assert_eq!(table.total_bet(100), 500);
    }
}
