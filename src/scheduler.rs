//! Fire-once deferred transitions.
//!
//! Each task carries the generation it was scheduled in.  Bumping the
//! generation drops everything pending, so a restart can never be hit by
//! a timer left over from the previous session.

/// What to do when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    LevelUp { tier: usize },
    GameOver,
}

#[derive(Clone, Debug)]
struct Task {
    due: f32,
    generation: u64,
    action: Deferred,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: f32,
    generation: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_pending(&self, action: Deferred) -> bool {
        self.tasks.iter().any(|t| t.action == action)
    }

    /// Fire `action` after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, action: Deferred) {
        self.tasks.push(Task {
            due: self.now + delay,
            generation: self.generation,
            action,
        });
    }

    /// Drop everything pending and start a new generation.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.tasks.clear();
    }

    /// Step the clock and return every task now due, in due order.
    pub fn advance(&mut self, dt: f32) -> Vec<Deferred> {
        self.now += dt;
        let now = self.now;
        let generation = self.generation;

        let mut due: Vec<Task> = Vec::new();
        self.tasks.retain(|t| {
            if t.due <= now {
                due.push(t.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter()
            .filter(|t| t.generation == generation)
            .map(|t| t.action)
            .collect()
    }
}
