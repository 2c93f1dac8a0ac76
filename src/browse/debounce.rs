use std::time::{Duration, Instant};

/// Fires once after `window` has passed without another [`Debouncer::arm`].
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per quiet period, then disarms.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(!debouncer.fire(Instant::now() + WINDOW * 4));
    }

    #[test]
    fn test_fires_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(start);

        assert!(!debouncer.fire(start + Duration::from_millis(499)));
        assert!(debouncer.fire(start + WINDOW));
        assert!(!debouncer.is_armed());
        assert!(!debouncer.fire(start + WINDOW * 2));
    }

    #[test]
    fn test_rearming_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(start);
        debouncer.arm(start + Duration::from_millis(300));

        assert!(!debouncer.fire(start + Duration::from_millis(600)));
        assert!(debouncer.fire(start + Duration::from_millis(800)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.arm(start);
        debouncer.cancel();
        assert!(!debouncer.fire(start + WINDOW));
    }
}
