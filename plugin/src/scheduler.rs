/// Minimum wall-clock gap between two full rescans.
pub const RESCAN_INTERVAL_MS: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanState {
    Idle,
    /// A rescan was requested on a tick and runs at the next scheduling step.
    Pending { requested_at_ms: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDecision {
    /// The member list is not loaded.
    NoContainer,
    /// The previous rescan is too recent.
    Throttled,
    /// A rescan is already waiting for the next scheduling step.
    AlreadyPending,
    Scheduled,
}

/// Throttles rescans to one per [`RESCAN_INTERVAL_MS`] and defers each by one
/// scheduling step so the client can finish rebuilding the list first.
#[derive(Debug, Clone)]
pub struct RescanScheduler {
    state: RescanState,
    last_rescan_ms: i64,
    interval_ms: i64,
}

impl Default for RescanScheduler {
    fn default() -> Self {
        Self::new(RESCAN_INTERVAL_MS)
    }
}

impl RescanScheduler {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            state: RescanState::Idle,
            last_rescan_ms: 0,
            interval_ms,
        }
    }

    pub fn state(&self) -> RescanState {
        self.state
    }

    pub fn last_rescan_ms(&self) -> i64 {
        self.last_rescan_ms
    }

    pub fn on_tick(&mut self, now_ms: i64, container_present: bool) -> TickDecision {
        if !container_present {
            return TickDecision::NoContainer;
        }
        if matches!(self.state, RescanState::Pending { .. }) {
            return TickDecision::AlreadyPending;
        }
        if now_ms - self.last_rescan_ms < self.interval_ms {
            return TickDecision::Throttled;
        }
        self.state = RescanState::Pending {
            requested_at_ms: now_ms,
        };
        TickDecision::Scheduled
    }

    /// Time of the tick that requested the waiting rescan. Whoever runs it
    /// reports back with [`RescanScheduler::complete`] or [`RescanScheduler::abandon`].
    pub fn pending_request(&self) -> Option<i64> {
        match self.state {
            RescanState::Pending { requested_at_ms } => Some(requested_at_ms),
            RescanState::Idle => None,
        }
    }

    pub fn complete(&mut self, now_ms: i64) {
        self.last_rescan_ms = now_ms;
        self.state = RescanState::Idle;
    }

    /// The container vanished before the deferred step ran. The throttle window
    /// is left as it was, so the next tick may try again straight away.
    pub fn abandon(&mut self) {
        self.state = RescanState::Idle;
    }

    pub fn reset(&mut self) {
        self.state = RescanState::Idle;
        self.last_rescan_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{RESCAN_INTERVAL_MS, RescanScheduler, RescanState, TickDecision};

    const START: i64 = 1_700_000_000_000;

    fn run_cycle(scheduler: &mut RescanScheduler, now_ms: i64) -> bool {
        if scheduler.on_tick(now_ms, true) != TickDecision::Scheduled {
            return false;
        }
        assert!(scheduler.pending_request().is_some());
        scheduler.complete(now_ms);
        true
    }

    #[test]
    fn first_tick_schedules_immediately() {
        let mut scheduler = RescanScheduler::default();
        assert_eq!(scheduler.on_tick(START, true), TickDecision::Scheduled);
        assert_eq!(
            scheduler.state(),
            RescanState::Pending {
                requested_at_ms: START
            }
        );
    }

    #[test]
    fn ticks_without_container_are_ignored() {
        let mut scheduler = RescanScheduler::default();
        assert_eq!(scheduler.on_tick(START, false), TickDecision::NoContainer);
        assert_eq!(scheduler.state(), RescanState::Idle);
        assert!(scheduler.pending_request().is_none());
    }

    #[test]
    fn triggers_inside_the_interval_collapse_into_one_pass() {
        let mut scheduler = RescanScheduler::default();
        assert!(run_cycle(&mut scheduler, START));
        assert!(!run_cycle(&mut scheduler, START + 600));
        assert!(!run_cycle(&mut scheduler, START + RESCAN_INTERVAL_MS - 1));
    }

    #[test]
    fn triggers_an_interval_apart_each_run() {
        let mut scheduler = RescanScheduler::default();
        assert!(run_cycle(&mut scheduler, START));
        assert!(run_cycle(&mut scheduler, START + RESCAN_INTERVAL_MS));
        assert_eq!(scheduler.last_rescan_ms(), START + RESCAN_INTERVAL_MS);
    }

    #[test]
    fn pending_rescan_blocks_further_scheduling() {
        let mut scheduler = RescanScheduler::default();
        assert_eq!(scheduler.on_tick(START, true), TickDecision::Scheduled);
        assert_eq!(
            scheduler.on_tick(START + 5_000, true),
            TickDecision::AlreadyPending
        );
    }

    #[test]
    fn abandoned_rescan_does_not_start_the_throttle_window() {
        let mut scheduler = RescanScheduler::default();
        assert!(run_cycle(&mut scheduler, START));

        let later = START + RESCAN_INTERVAL_MS;
        assert_eq!(scheduler.on_tick(later, true), TickDecision::Scheduled);
        scheduler.abandon();
        assert_eq!(scheduler.last_rescan_ms(), START);
        assert_eq!(scheduler.on_tick(later + 1, true), TickDecision::Scheduled);
    }
}
