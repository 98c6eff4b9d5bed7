use std::time::{Duration, Instant};

/// Fixed-interval tick source polled from the frame loop.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Starts ticking; the first tick is due one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Changes the interval. An armed ticker restarts its countdown from `now`.
    pub fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.next_due.is_some() {
            self.arm(now);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Reports at most one due tick per call, then counts the next interval from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(100 * MS);
        assert!(!ticker.poll(t0 + 500 * MS));

        ticker.arm(t0);
        assert!(!ticker.poll(t0 + 99 * MS));
        assert!(ticker.poll(t0 + 100 * MS));
        assert!(!ticker.poll(t0 + 150 * MS));
        assert!(ticker.poll(t0 + 200 * MS));
    }

    #[test]
    fn cancel_stops_ticks() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(10 * MS);
        ticker.arm(t0);
        ticker.cancel();
        assert!(!ticker.is_armed());
        assert!(!ticker.poll(t0 + 1000 * MS));
    }

    #[test]
    fn reschedule_restarts_countdown_only_when_armed() {
        let t0 = Instant::now();
        let mut ticker = Ticker::new(150 * MS);
        ticker.reschedule(50 * MS, t0);
        assert!(!ticker.is_armed());
        assert_eq!(ticker.interval(), 50 * MS);

        ticker.arm(t0);
        ticker.reschedule(140 * MS, t0 + 40 * MS);
        assert!(!ticker.poll(t0 + 150 * MS));
        assert!(ticker.poll(t0 + 180 * MS));
    }
}
