//! Choice points and contradiction recovery policies

use crate::io::configuration::{BacktrackKind, PATIENCE_BASE_JUMP, PATIENCE_BASE_TIMEOUT};
use std::collections::VecDeque;

/// A deliberate selection that opened a new trail segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoicePoint {
    /// Trail length just before the selection
    pub trail_len: usize,
    /// Cell that was decided
    pub cell: usize,
    /// Pattern chosen for it
    pub pattern: usize,
}

/// Stack of open choice points with an optional depth cap
///
/// When the cap is exceeded the oldest choice point is forgotten; the search
/// can then never unwind past it.
#[derive(Debug, Clone, Default)]
pub struct ChoiceStack {
    points: VecDeque<ChoicePoint>,
    max_depth: Option<usize>,
    forgotten: usize,
}

impl ChoiceStack {
    /// Create an empty stack
    pub const fn new(max_depth: Option<usize>) -> Self {
        Self {
            points: VecDeque::new(),
            max_depth,
            forgotten: 0,
        }
    }

    /// Open a new choice point
    pub fn push(&mut self, point: ChoicePoint) {
        self.points.push_back(point);
        if self.max_depth.is_some_and(|max| self.points.len() > max) {
            self.points.pop_front();
            self.forgotten += 1;
        }
    }

    /// Close the most recent choice point
    pub fn pop(&mut self) -> Option<ChoicePoint> {
        self.points.pop_back()
    }

    /// Number of open choice points
    pub fn depth(&self) -> usize {
        self.points.len()
    }

    /// Number of choice points dropped by the depth cap
    pub const fn forgotten(&self) -> usize {
        self.forgotten
    }
}

#[derive(Debug, Clone, Copy)]
struct Level {
    depth: i64,
    timeout: u64,
}

/// Escalating backjumps
///
/// After `PATIENCE_BASE_TIMEOUT` failed backtracks the search jumps back
/// `PATIENCE_BASE_JUMP` choice points. Each further level waits twice as long
/// and jumps twice as far. Reaching a new maximum depth resets all levels.
#[derive(Debug, Clone, Default)]
pub struct PatienceBackjump {
    counter: u64,
    max_depth: usize,
    start: u64,
    levels: Vec<Level>,
}

impl PatienceBackjump {
    /// Note a new choice point at `depth`
    pub fn on_choice(&mut self, depth: usize) {
        if depth > self.max_depth {
            self.max_depth = depth;
            self.levels.clear();
            self.start = self.counter;
        }
    }

    /// Note one unwound choice point
    pub const fn on_backtrack(&mut self) {
        self.counter += 1;
    }

    /// Choice points to unwind from `depth`
    pub fn backjump(&mut self, depth: usize) -> usize {
        let live = self
            .levels
            .iter()
            .position(|level| level.timeout > self.counter)
            .unwrap_or(self.levels.len());
        if live == self.levels.len() {
            self.levels.push(self.create_level(live));
        }
        if live == 0 {
            return 1;
        }

        let target = self.levels.get(live - 1).map_or(0, |level| level.depth);
        for (index, level) in self.levels.iter_mut().enumerate().take(live) {
            level.timeout = self.counter + PATIENCE_BASE_TIMEOUT * (1 << index);
        }
        (depth as i64 - target).max(1) as usize
    }

    fn create_level(&self, index: usize) -> Level {
        Level {
            depth: self.max_depth as i64 - (PATIENCE_BASE_JUMP << index) as i64,
            timeout: self.start + PATIENCE_BASE_TIMEOUT * (1 << index),
        }
    }
}

/// How far to unwind on contradiction
#[derive(Debug, Clone)]
pub enum BacktrackPolicy {
    /// Never unwind
    GiveUp,
    /// Always unwind a fixed number of choice points
    Constant(usize),
    /// Escalating backjumps
    Patience(PatienceBackjump),
}

impl BacktrackPolicy {
    /// Policy for a configured kind
    pub fn from_kind(kind: BacktrackKind) -> Self {
        match kind {
            BacktrackKind::None => Self::GiveUp,
            BacktrackKind::Backtrack => Self::Constant(1),
            BacktrackKind::Constant(amount) => Self::Constant(amount),
            BacktrackKind::Backjump => Self::Patience(PatienceBackjump::default()),
        }
    }

    /// Note a new choice point at `depth`
    pub fn on_choice(&mut self, depth: usize) {
        if let Self::Patience(patience) = self {
            patience.on_choice(depth);
        }
    }

    /// Note one unwound choice point
    pub const fn on_backtrack(&mut self) {
        if let Self::Patience(patience) = self {
            patience.on_backtrack();
        }
    }

    /// Choice points to unwind; 0 means give up
    pub fn backjump(&mut self, depth: usize) -> usize {
        match self {
            Self::GiveUp => 0,
            Self::Constant(amount) => *amount,
            Self::Patience(patience) => patience.backjump(depth),
        }
    }
}
