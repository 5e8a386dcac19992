//! # fs-slot-lab: FruitSpin Slot Engine
//!
//! A three-by-three fruit machine: weighted reels, five paylines, cheat
//! overrides and a timed spin lifecycle with auto-spin.
//!
//! ## Features
//!
//! - **Weighted Reels**: Ten-symbol catalog sampled by weight
//! - **Paylines**: Three rows and two diagonals, full-width matches pay
//! - **Cheats**: Forced win rate, forced middle row, always-jackpot
//! - **Lifecycle**: `Idle → Spinning → Settling → Idle` on a logical clock
//! - **Win-Rate Drift**: Effective win rate redrawn every 100 spins
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── GameState (credits, bet, stats, cheats)
//!     ├── ReelGenerator (sampler + override policy)
//!     ├── PayTable (paylines, evaluation)
//!     └── Scheduler (Resolve / AutoContinue tasks)
//!           │
//!           v
//!     RoundReport → StateSink
//! ```

pub mod cheats;
pub mod config;
pub mod machine;
pub mod paytable;
pub mod reels;
pub mod state;
pub mod stats;
pub mod symbols;
pub mod timing;

pub use cheats::*;
pub use config::*;
pub use machine::*;
pub use paytable::*;
pub use reels::*;
pub use state::*;
pub use stats::*;
pub use symbols::*;
pub use timing::*;
