//! Spin timing profiles and the cooperative task scheduler

use serde::{Deserialize, Serialize};

/// Timing profile for the spin lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Resolve immediately (tests, batch simulation)
    Instant,
    /// Hand-set delays
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

/// Delays driving the spin lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Spin start to resolution (reel animation), ms
    pub resolve_delay_ms: u64,

    /// Settled round to the next auto-spin, ms
    pub autospin_delay_ms: u64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            resolve_delay_ms: 1600,
            autospin_delay_ms: 2000,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            resolve_delay_ms: 600,
            autospin_delay_ms: 800,
        }
    }

    /// Immediate resolution; auto-spin still advances the clock by 1 ms per round
    pub fn instant() -> Self {
        Self {
            profile: TimingProfile::Instant,
            resolve_delay_ms: 0,
            autospin_delay_ms: 1,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Instant => Self::instant(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Auto-spin pacing must outlast resolution
    pub fn is_valid(&self) -> bool {
        self.autospin_delay_ms > self.resolve_delay_ms
    }

    /// One full auto-spin round
    pub fn round_duration_ms(&self) -> u64 {
        self.resolve_delay_ms + self.autospin_delay_ms
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// Cancellation handle for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Scheduled<T> {
    handle: TaskHandle,
    due_ms: u64,
    task: T,
}

/// Single-threaded scheduler over a logical millisecond clock.
///
/// Tasks fire in `(due, scheduling order)` order; nothing runs until the owner
/// advances the clock or pops a task.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            queue: Vec::new(),
        }
    }

    /// Current logical time
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.queue.push(Scheduled {
            handle,
            due_ms: self.now_ms.saturating_add(delay_ms),
            task,
        });
        handle
    }

    /// Drop a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.queue.len();
        self.queue.retain(|s| s.handle != handle);
        self.queue.len() != before
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.queue.iter().any(|s| s.handle == handle)
    }

    /// Due time of the earliest task
    pub fn next_due(&self) -> Option<u64> {
        self.queue.iter().map(|s| s.due_ms).min()
    }

    /// Remove and return the earliest task due at or before `until_ms`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TaskHandle, T)> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= until_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.handle.0))
            .map(|(idx, _)| idx)?;

        let scheduled = self.queue.remove(idx);
        self.now_ms = self.now_ms.max(scheduled.due_ms);
        Some((scheduled.handle, scheduled.task))
    }

    /// Remove and return the earliest task regardless of its due time
    pub fn pop_next(&mut self) -> Option<(TaskHandle, T)> {
        let due = self.next_due()?;
        self.pop_due(due)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
