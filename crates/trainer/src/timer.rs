use std::time::{Duration, Instant};

const MIN_PERIOD: Duration = Duration::from_nanos(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// What a repeating timer does when the event loop wakes up late.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missed {
    /// Fire once for every deadline that passed.
    Replay,
    /// Fire once and move the next deadline past `now`.
    Skip,
}

#[derive(Debug)]
struct Timer {
    handle: TimerHandle,
    deadline: Instant,
    period: Duration,
    missed: Missed,
}

/// Repeating timers driven by an outside event loop.
///
/// Nothing here sleeps or spawns: the loop asks for `next_deadline`, waits,
/// and drains due timers with `pop_due`.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_repeating(
        &mut self,
        first_deadline: Instant,
        period: Duration,
        missed: Missed,
    ) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            handle,
            deadline: first_deadline,
            period: period.max(MIN_PERIOD),
            missed,
        });
        handle
    }

    /// Returns whether the timer was still scheduled. Cancelling twice is fine.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        before != self.timers.len()
    }

    /// Changes the period from the next re-arm on; the pending deadline stays.
    pub fn set_period(&mut self, handle: TimerHandle, period: Duration) -> bool {
        match self.timers.iter_mut().find(|timer| timer.handle == handle) {
            Some(timer) => {
                timer.period = period.max(MIN_PERIOD);
                true
            }
            None => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|timer| timer.deadline).min()
    }

    /// Takes the earliest timer due at `now`, re-arms it and returns it with
    /// the deadline it fired for. Ties go to the older timer.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerHandle, Instant)> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|timer| timer.deadline <= now)
            .min_by_key(|timer| (timer.deadline, timer.handle.0))?;
        let fired = timer.deadline;
        timer.deadline = fired + timer.period;
        if timer.missed == Missed::Skip {
            while timer.deadline <= now {
                timer.deadline += timer.period;
            }
        }
        Some((timer.handle, fired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn replay_fires_every_missed_deadline() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let beat = queue.schedule_repeating(start + ms(100), ms(100), Missed::Replay);
        let now = start + ms(350);
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(now)).collect();
        assert_eq!(
            fired,
            vec![
                (beat, start + ms(100)),
                (beat, start + ms(200)),
                (beat, start + ms(300))
            ]
        );
        assert_eq!(queue.next_deadline(), Some(start + ms(400)));
    }

    #[test]
    fn skip_fires_once() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let frame = queue.schedule_repeating(start + ms(16), ms(16), Missed::Skip);
        let now = start + ms(100);
        assert_eq!(queue.pop_due(now), Some((frame, start + ms(16))));
        assert_eq!(queue.pop_due(now), None);
        assert_eq!(queue.next_deadline(), Some(start + ms(112)));
    }

    #[test]
    fn earliest_deadline_wins_and_ties_go_to_older_timer() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let a = queue.schedule_repeating(start + ms(50), ms(50), Missed::Replay);
        let b = queue.schedule_repeating(start + ms(50), ms(10), Missed::Replay);
        let c = queue.schedule_repeating(start + ms(40), ms(100), Missed::Replay);
        let now = start + ms(50);
        assert_eq!(queue.pop_due(now).map(|(h, _)| h), Some(c));
        assert_eq!(queue.pop_due(now).map(|(h, _)| h), Some(a));
        assert_eq!(queue.pop_due(now).map(|(h, _)| h), Some(b));
        assert_eq!(queue.pop_due(now), None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(start, ms(10), Missed::Replay);
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert_eq!(queue.pop_due(start + ms(100)), None);
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn period_change_applies_after_pending_deadline() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(start + ms(100), ms(100), Missed::Replay);
        assert!(queue.set_period(handle, ms(50)));
        assert_eq!(queue.next_deadline(), Some(start + ms(100)));
        queue.pop_due(start + ms(100));
        assert_eq!(queue.next_deadline(), Some(start + ms(150)));
        assert!(!queue.set_period(TimerHandle(99), ms(10)));
    }

    #[test]
    fn zero_period_is_clamped() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(start, Duration::ZERO, Missed::Replay);
        assert_eq!(queue.pop_due(start), Some((handle, start)));
        assert!(queue.next_deadline().unwrap() > start);
    }
}
