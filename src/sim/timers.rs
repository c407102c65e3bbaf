//! Wall-clock timers for a battle
//!
//! Timers are plain scheduled events tagged with the battle generation they
//! were armed in. Resetting the queue bumps the generation, so anything
//! armed for an earlier battle is dropped instead of firing into new state.

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// End the combo run armed with this token
    ComboTimeout { token: u64 },
    /// Return an entity's target scale to 1.0 after a tap animation
    RestoreScale { entity: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Timer {
    due: f64,
    generation: u64,
    kind: TimerKind,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    generation: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Arm a timer for the current generation
    pub fn schedule(&mut self, due: f64, kind: TimerKind) {
        self.timers.push(Timer {
            due,
            generation: self.generation,
            kind,
        });
    }

    /// Remove and return every timer due at `now`, oldest deadline first.
    /// Timers from earlier generations are discarded.
    pub fn take_due(&mut self, now: f64) -> Vec<TimerKind> {
        let generation = self.generation;
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|t| {
            if t.generation != generation {
                return false;
            }
            if t.due <= now {
                due.push(*t);
                return false;
            }
            true
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|t| t.kind).collect()
    }

    /// Cancel everything and start a new generation
    pub fn reset(&mut self) {
        self.timers.clear();
        self.generation += 1;
    }
}
