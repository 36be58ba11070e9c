// core/timer.rs
//
// Deferred one-shot callbacks, expressed as data.
// A timer carries a token that the owner interprets when it fires, so a
// cancelled timer can never reach torn-down state.

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u32);

/// A single one-shot countdown.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    remaining: f32,
    fired: bool,
}

impl Timer {
    pub fn new(delay: f32) -> Self {
        Self {
            remaining: delay.max(0.0),
            fired: false,
        }
    }

    /// Advance by `dt`. Returns true exactly once, on the frame the delay elapses.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.fired = true;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn is_done(&self) -> bool {
        self.fired
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    id: TimerId,
    timer: Timer,
    token: T,
}

/// Queue of pending timers, each carrying a caller-defined token.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    pending: Vec<Pending<T>>,
    next_id: u32,
}

impl<T: Clone> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Schedule `token` to fire after `delay` seconds.
    pub fn schedule(&mut self, delay: f32, token: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            timer: Timer::new(delay),
            token,
        });
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("cancelling {} pending timers", self.pending.len());
        }
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Advance all timers. Returns fired tokens, earliest deadline first.
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut fired: Vec<(f32, T)> = Vec::new();
        self.pending.retain_mut(|p| {
            let due_at = p.timer.remaining();
            if p.timer.tick(dt) {
                fired.push((due_at, p.token.clone()));
                false
            } else {
                true
            }
        });
        fired.sort_by(|a, b| a.0.total_cmp(&b.0));
        fired.into_iter().map(|(_, token)| token).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T: Clone> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once() {
        let mut t = Timer::new(1.0);
        assert!(!t.tick(0.5));
        assert!(t.tick(0.5));
        assert!(!t.tick(0.5));
        assert!(t.is_done());
    }

    #[test]
    fn queue_fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(0.3, "late");
        q.schedule(0.1, "early");
        let fired = q.tick(0.5);
        assert_eq!(fired, vec!["early", "late"]);
        assert!(q.is_empty());
    }

    #[test]
    fn pending_timer_survives_short_tick() {
        let mut q = TimerQueue::new();
        let id = q.schedule(1.0, 3u32);
        assert!(q.tick(0.4).is_empty());
        assert!(q.is_pending(id));
        assert_eq!(q.tick(0.6), vec![3]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(1.0, 7u32);
        assert!(q.cancel(id));
        assert!(q.tick(2.0).is_empty());
        assert!(!q.cancel(id));
    }

    #[test]
    fn cancel_all_clears_pending() {
        let mut q = TimerQueue::new();
        q.schedule(1.0, 1u32);
        q.schedule(2.0, 2u32);
        q.cancel_all();
        assert!(q.tick(5.0).is_empty());
    }
}
