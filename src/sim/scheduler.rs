//! Timed tasks on the simulation clock
//!
//! Spawn cadence, ball expiry and score-window resolution are all deferred
//! work. Tasks are keyed by the body they reference so they can be cancelled
//! individually (ball captured) or in bulk (world cleared).

use super::body::BodyId;

/// Deferred work item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Spawn the next ball at the given spawn point
    SpawnBall { spawn_index: usize },
    /// Force-remove a ball whose lifetime ran out
    ExpireBall { ball: BodyId },
    /// Close the open scoring window
    ResolveScoreWindow,
}

impl Task {
    /// Body this task refers to, if any
    pub fn body(&self) -> Option<BodyId> {
        match self {
            Task::ExpireBall { ball } => Some(*ball),
            _ => None,
        }
    }
}

/// A task together with the time it fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub due_ms: f64,
    seq: u64,
    pub task: Task,
}

/// Pending tasks, fired in (due time, insertion order)
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, task: Task) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_ms, seq, task });
    }

    /// Remove and return every task due at or before `now_ms`, in firing order
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Scheduled> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due
    }

    /// Cancel every task that references `body`. Returns how many were dropped.
    pub fn cancel_body(&mut self, body: BodyId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|s| s.task.body() != Some(body));
        before - self.pending.len()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Due time of a specific pending task
    pub fn due_of(&self, task: Task) -> Option<f64> {
        self.pending.iter().find(|s| s.task == task).map(|s| s.due_ms)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
