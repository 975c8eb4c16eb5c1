use crate::DialUnit;
use derive_more::Display;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// Identifies a periodic task owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TaskKey {
    #[display("countdown")]
    Countdown,
    #[display("animation:{_0}")]
    Animation(DialUnit),
}

/// One scheduled run of a task. A fresh generation is issued every time the
/// task is (re)started, so a firing that was already queued when its task got
/// cancelled can be told apart from a live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{key}#{generation}")]
pub struct Ticket {
    pub key: TaskKey,
    pub generation: u64,
}

/// Host event loop facility for cancelable periodic callbacks. Implementors
/// call back with the ticket they were started with every `period` until
/// stopped.
pub trait Scheduler {
    fn start(&mut self, ticket: Ticket, period: Duration);
    fn stop(&mut self, key: TaskKey);
}

impl<S: Scheduler> Scheduler for Rc<RefCell<S>> {
    fn start(&mut self, ticket: Ticket, period: Duration) {
        self.borrow_mut().start(ticket, period);
    }

    fn stop(&mut self, key: TaskKey) {
        self.borrow_mut().stop(key);
    }
}

/// Live task bookkeeping on top of a [`Scheduler`]. Stops everything it
/// still owns when dropped.
#[derive(Debug)]
pub struct TaskSet<S: Scheduler> {
    scheduler: S,
    live: HashMap<TaskKey, u64>,
    next_generation: u64,
}

impl<S: Scheduler> TaskSet<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            live: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Starts `key` with a fresh cadence, replacing any live run of it.
    pub fn start(&mut self, key: TaskKey, period: Duration) -> Ticket {
        if self.live.contains_key(&key) {
            self.scheduler.stop(key);
        }
        self.next_generation += 1;
        let ticket = Ticket {
            key,
            generation: self.next_generation,
        };
        self.live.insert(key, ticket.generation);
        self.scheduler.start(ticket, period);
        ticket
    }

    /// Starts `key` only if it is not already running.
    pub fn ensure(&mut self, key: TaskKey, period: Duration) {
        if !self.is_running(key) {
            self.start(key, period);
        }
    }

    pub fn stop(&mut self, key: TaskKey) {
        if self.live.remove(&key).is_some() {
            self.scheduler.stop(key);
        }
    }

    pub fn stop_where(&mut self, mut pred: impl FnMut(TaskKey) -> bool) {
        let keys: Vec<TaskKey> = self.live.keys().copied().filter(|k| pred(*k)).collect();
        for key in keys {
            self.stop(key);
        }
    }

    pub fn is_running(&self, key: TaskKey) -> bool {
        self.live.contains_key(&key)
    }

    pub fn is_live(&self, ticket: Ticket) -> bool {
        self.live.get(&ticket.key) == Some(&ticket.generation)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: Scheduler> Drop for TaskSet<S> {
    fn drop(&mut self) {
        self.stop_where(|_| true);
    }
}

/// Scheduler that never fires on its own; callers inspect the active tasks
/// and deliver tickets by hand. Drives time in tests and headless use.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: HashMap<TaskKey, (Ticket, Duration)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket(&self, key: TaskKey) -> Option<Ticket> {
        self.active.get(&key).map(|(ticket, _)| *ticket)
    }

    pub fn period(&self, key: TaskKey) -> Option<Duration> {
        self.active.get(&key).map(|(_, period)| *period)
    }

    pub fn is_active(&self, key: TaskKey) -> bool {
        self.active.contains_key(&key)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, ticket: Ticket, period: Duration) {
        self.active.insert(ticket.key, (ticket, period));
    }

    fn stop(&mut self, key: TaskKey) {
        self.active.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_restart_issues_new_generation() {
        let mut tasks = TaskSet::new(ManualScheduler::new());
        let first = tasks.start(TaskKey::Countdown, SECOND);
        let second = tasks.start(TaskKey::Countdown, SECOND);
        assert_ne!(first, second);
        assert!(!tasks.is_live(first));
        assert!(tasks.is_live(second));
        assert_eq!(tasks.scheduler().ticket(TaskKey::Countdown), Some(second));
    }

    #[test]
    fn test_stop_invalidates_ticket() {
        let mut tasks = TaskSet::new(ManualScheduler::new());
        let ticket = tasks.start(TaskKey::Countdown, SECOND);
        tasks.stop(TaskKey::Countdown);
        assert!(!tasks.is_live(ticket));
        assert!(!tasks.scheduler().is_active(TaskKey::Countdown));
    }

    #[test]
    fn test_ensure_keeps_cadence() {
        let mut tasks = TaskSet::new(ManualScheduler::new());
        let key = TaskKey::Animation(DialUnit::Minutes);
        let ticket = tasks.start(key, Duration::from_millis(16));
        tasks.ensure(key, Duration::from_millis(16));
        assert!(tasks.is_live(ticket));
    }

    #[test]
    fn test_stop_where_filters() {
        let mut tasks = TaskSet::new(ManualScheduler::new());
        tasks.start(TaskKey::Countdown, SECOND);
        tasks.start(TaskKey::Animation(DialUnit::Hours), SECOND);
        tasks.start(TaskKey::Animation(DialUnit::Seconds), SECOND);
        tasks.stop_where(|k| matches!(k, TaskKey::Animation(_)));
        assert_eq!(tasks.scheduler().active_count(), 1);
        assert!(tasks.is_running(TaskKey::Countdown));
    }

    #[test]
    fn test_drop_stops_live_tasks() {
        let shared = Rc::new(RefCell::new(ManualScheduler::new()));
        {
            let mut tasks = TaskSet::new(shared.clone());
            tasks.start(TaskKey::Countdown, SECOND);
            tasks.start(TaskKey::Animation(DialUnit::Minutes), SECOND);
            assert_eq!(shared.borrow().active_count(), 2);
        }
        assert_eq!(shared.borrow().active_count(), 0);
    }

    #[test]
    fn test_ticket_display() {
        let ticket = Ticket {
            key: TaskKey::Animation(DialUnit::Hours),
            generation: 7,
        };
        assert_eq!(ticket.to_string(), "animation:hours#7");
    }
}
