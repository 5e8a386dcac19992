//! Spin lifecycle state machine
//!
//! `Idle → Spinning → Settling → Idle`. Every mutation of [`GameState`] goes
//! through [`SlotMachine::dispatch`] or a task fired by the machine's own
//! [`Scheduler`]; the caller drives the logical clock with
//! [`SlotMachine::advance`] or [`SlotMachine::step`].

use fs_core::{Credits, FsResult, RandomSource};
use serde::Serialize;

use crate::cheats::CheatAction;
use crate::config::GameConfig;
use crate::paytable::{LineWin, PayTable};
use crate::reels::{Grid, ReelGenerator, ReelMode};
use crate::state::{GameState, Phase, Settings};
use crate::stats::{Stats, WinTier};
use crate::timing::{Scheduler, TaskHandle};

// ═══════════════════════════════════════════════════════════════════════════════
// ACTIONS & OUTCOMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Requests accepted by [`SlotMachine::dispatch`]
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Spin,
    ToggleAutoSpin,
    SetLineBet(u32),
    SetCredits(Credits),
    Cheat(CheatAction),
    ResetStats,
    UpdateSettings(Settings),
    /// Replace the session (e.g. from a save file)
    Restore(Box<GameState>),
}

/// Work the machine schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Settle the spin in flight
    Resolve,
    /// Start the next auto-spin
    AutoContinue,
}

/// Why a dispatch was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A round is in flight
    Busy,
    /// Credits below the total bet
    InsufficientCredits,
}

/// Result of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl DispatchOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Receives the session whenever it settles in `Idle`
pub trait StateSink {
    fn persist(&mut self, state: &GameState);
}

/// Summary of one settled round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    /// 1-based, equals `stats.total_spins` after the round
    pub spin_number: u64,
    pub grid: Grid,
    pub mode: ReelMode,
    pub line_wins: Vec<LineWin>,
    pub winning_lines: Vec<usize>,
    pub payout: Credits,
    pub total_bet: Credits,
    pub tier: WinTier,
    pub credits_after: Credits,
    /// New effective win rate if drift fired this round
    pub drifted_win_rate: Option<f64>,
}

impl RoundReport {
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SLOT MACHINE
// ═══════════════════════════════════════════════════════════════════════════════

/// The game session: state, randomness, timers and persistence hook
pub struct SlotMachine<R: RandomSource> {
    config: GameConfig,
    state: GameState,
    rng: R,
    generator: ReelGenerator,
    paytable: PayTable,
    scheduler: Scheduler<ScheduledTask>,
    /// At most one outstanding task
    pending: Option<(TaskHandle, ScheduledTask)>,
    win_animation: bool,
    last_round: Option<RoundReport>,
    sink: Option<Box<dyn StateSink>>,
}

impl<R: RandomSource> SlotMachine<R> {
    /// Fresh session for a validated config
    pub fn new(config: GameConfig, rng: R) -> FsResult<Self> {
        config.validate()?;
        let state = GameState::new(&config);
        log::info!(
            "Slot machine ready: {} credits, {:?} timing",
            state.credits,
            config.timing.profile
        );
        Ok(Self {
            config,
            state,
            rng,
            generator: ReelGenerator::new(),
            paytable: PayTable::standard(),
            scheduler: Scheduler::new(),
            pending: None,
            win_animation: false,
            last_round: None,
            sink: None,
        })
    }

    /// Attach a persistence sink
    pub fn with_sink(mut self, sink: Box<dyn StateSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Option<Box<dyn StateSink>>) {
        self.sink = sink;
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn stats(&self) -> &Stats {
        &self.state.stats
    }

    pub fn paytable(&self) -> &PayTable {
        &self.paytable
    }

    /// Outstanding scheduled task, if any
    pub fn pending_task(&self) -> Option<ScheduledTask> {
        self.pending.map(|(_, task)| task)
    }

    /// Set by a winning round, cleared by the next spin
    pub fn win_animation_active(&self) -> bool {
        self.win_animation
    }

    pub fn last_round(&self) -> Option<&RoundReport> {
        self.last_round.as_ref()
    }

    /// Logical clock, ms
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now()
    }

    // ─── Dispatch ───────────────────────────────────────────────────────────

    /// Apply one request. Guarded requests return `Ignored` and change nothing.
    pub fn dispatch(&mut self, action: Action) -> DispatchOutcome {
        match action {
            Action::Spin => self.start_spin(),
            Action::ToggleAutoSpin => self.toggle_auto_spin(),
            Action::SetLineBet(line_bet) => self.when_idle(|m| {
                let clamped = m.config.clamp_line_bet(line_bet);
                m.state.set_line_bet(clamped);
                log::debug!("Line bet {} (total {})", clamped, m.state.total_bet);
            }),
            Action::SetCredits(credits) => self.when_idle(|m| {
                m.state.credits = credits;
                log::info!("Credits set to {}", credits);
            }),
            Action::Cheat(cheat) => {
                if self.state.cheats.apply(cheat) {
                    self.state.stats.has_cheated = true;
                }
                log::debug!("Cheats: {:?}", self.state.cheats);
                self.persist();
                DispatchOutcome::Applied
            }
            Action::ResetStats => self.when_idle(|m| {
                m.state.stats = Stats::default();
                log::info!("Stats reset");
            }),
            Action::UpdateSettings(settings) => {
                self.state.settings = settings.normalized();
                self.persist();
                DispatchOutcome::Applied
            }
            Action::Restore(state) => self.when_idle(|m| m.restore(*state)),
        }
    }

    fn when_idle(&mut self, apply: impl FnOnce(&mut Self)) -> DispatchOutcome {
        if self.state.is_busy() {
            return DispatchOutcome::Ignored(IgnoreReason::Busy);
        }
        apply(self);
        self.persist();
        DispatchOutcome::Applied
    }

    fn restore(&mut self, mut state: GameState) {
        self.cancel_pending();
        state.phase = Phase::Idle;
        let line_bet = self.config.clamp_line_bet(state.line_bet);
        state.set_line_bet(line_bet);
        state.current_win_rate = if state.current_win_rate.is_finite() {
            state.current_win_rate.clamp(0.0, 1.0)
        } else {
            self.config.default_win_rate
        };
        state.stats.has_cheated |= state.cheats.enabled;
        self.state = state;
        self.win_animation = false;
        log::info!("Session restored: {} credits", self.state.credits);
    }

    fn start_spin(&mut self) -> DispatchOutcome {
        if self.state.is_busy() {
            log::debug!("Spin ignored: round in flight");
            return DispatchOutcome::Ignored(IgnoreReason::Busy);
        }
        if !self.state.can_afford_spin() {
            log::debug!(
                "Spin ignored: {} credits < bet {}",
                self.state.credits,
                self.state.total_bet
            );
            return DispatchOutcome::Ignored(IgnoreReason::InsufficientCredits);
        }

        self.cancel_pending();
        self.state.credits -= self.state.total_bet;
        self.state.active_paylines.clear();
        self.state.phase = Phase::Spinning;
        self.win_animation = false;

        let handle = self
            .scheduler
            .schedule(self.config.timing.resolve_delay_ms, ScheduledTask::Resolve);
        self.pending = Some((handle, ScheduledTask::Resolve));
        DispatchOutcome::Applied
    }

    fn toggle_auto_spin(&mut self) -> DispatchOutcome {
        self.state.auto_spin = !self.state.auto_spin;
        log::info!(
            "Auto-spin {}",
            if self.state.auto_spin { "on" } else { "off" }
        );

        if !self.state.auto_spin {
            if self.pending_task() == Some(ScheduledTask::AutoContinue) {
                self.cancel_pending();
            }
        } else if !self.state.is_busy() && self.state.can_afford_spin() {
            self.start_spin();
        }
        DispatchOutcome::Applied
    }

    // ─── Clock ──────────────────────────────────────────────────────────────

    /// Move the clock forward `ms`, firing every task that falls due.
    pub fn advance(&mut self, ms: u64) -> Vec<RoundReport> {
        let until = self.scheduler.now().saturating_add(ms);
        let mut reports = Vec::new();
        while let Some((handle, task)) = self.scheduler.pop_due(until) {
            if let Some(report) = self.run_task(handle, task) {
                reports.push(report);
            }
        }
        self.scheduler.advance_to(until);
        reports
    }

    /// Jump to and fire the next task. Returns false if nothing was pending.
    pub fn step(&mut self) -> bool {
        match self.scheduler.pop_next() {
            Some((handle, task)) => {
                self.run_task(handle, task);
                true
            }
            None => false,
        }
    }

    /// Settle the round in flight, jumping the clock to its resolution.
    pub fn finish_round(&mut self) -> Option<RoundReport> {
        while self.pending_task() == Some(ScheduledTask::Resolve) {
            let (handle, task) = self.scheduler.pop_next()?;
            if let Some(report) = self.run_task(handle, task) {
                return Some(report);
            }
        }
        None
    }

    /// Teardown: settle a round already debited, then drop any continuation.
    pub fn shutdown(&mut self) -> Option<RoundReport> {
        let report = self.finish_round();
        self.cancel_pending();
        self.scheduler.clear();
        log::info!("Slot machine shut down at {}ms", self.scheduler.now());
        report
    }

    fn run_task(&mut self, handle: TaskHandle, task: ScheduledTask) -> Option<RoundReport> {
        if self.pending.map(|(h, _)| h) == Some(handle) {
            self.pending = None;
        }
        match task {
            ScheduledTask::Resolve => Some(self.resolve()),
            ScheduledTask::AutoContinue => {
                if self.state.auto_spin {
                    self.start_spin();
                }
                None
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some((handle, task)) = self.pending.take() {
            if self.scheduler.cancel(handle) {
                log::debug!("Cancelled {:?}", task);
            }
        }
    }

    // ─── Resolution ─────────────────────────────────────────────────────────

    fn resolve(&mut self) -> RoundReport {
        self.state.phase = Phase::Settling;

        let params = self.state.cheats.spin_params(self.state.current_win_rate);
        let (grid, mode) = self.generator.generate_with_mode(&mut self.rng, params);
        let evaluation = self.paytable.evaluate(&grid, self.state.line_bet);
        let payout = evaluation.total_payout;

        if payout > 0 {
            self.state.credits = self.state.credits.saturating_add(payout);
            self.win_animation = true;
        }
        self.state.last_win = payout;
        self.state
            .stats
            .record_round(payout, self.state.total_bet);

        let drifted_win_rate = self.apply_drift();

        self.state.active_paylines = evaluation.winning_lines();
        self.state.reels = Some(grid.clone());
        self.state.phase = Phase::Idle;

        let report = RoundReport {
            spin_number: self.state.stats.total_spins,
            grid,
            mode,
            winning_lines: self.state.active_paylines.clone(),
            line_wins: evaluation.line_wins,
            payout,
            total_bet: self.state.total_bet,
            tier: WinTier::classify(payout),
            credits_after: self.state.credits,
            drifted_win_rate,
        };
        log::debug!(
            "Spin #{} {:?}: payout {} on lines {:?}, credits {}",
            report.spin_number,
            report.mode,
            report.payout,
            report.winning_lines,
            report.credits_after
        );

        self.persist();
        self.schedule_auto_continue();
        self.last_round = Some(report.clone());
        report
    }

    /// Redraw the effective win rate on the drift cadence while cheats are off.
    fn apply_drift(&mut self) -> Option<f64> {
        if self.state.cheats.enabled
            || self.state.stats.total_spins % self.config.drift_interval != 0
        {
            return None;
        }
        let rate = self
            .rng
            .next_in(self.config.drift_min, self.config.drift_max);
        self.state.current_win_rate = rate;
        log::info!(
            "Win rate drifted to {:.3} after {} spins",
            rate,
            self.state.stats.total_spins
        );
        Some(rate)
    }

    fn schedule_auto_continue(&mut self) {
        if !self.state.auto_spin {
            return;
        }
        if !self.state.can_afford_spin() {
            log::info!(
                "Auto-spin idle: {} credits < bet {}",
                self.state.credits,
                self.state.total_bet
            );
            return;
        }
        let handle = self.scheduler.schedule(
            self.config.timing.autospin_delay_ms,
            ScheduledTask::AutoContinue,
        );
        self.pending = Some((handle, ScheduledTask::AutoContinue));
    }

    fn persist(&mut self) {
        if self.state.is_busy() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.persist(&self.state);
        }
    }
}
