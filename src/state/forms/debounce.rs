//! Trailing-edge debounce with duplicate suppression

use std::time::{Duration, Instant};

/// Quiet period before a form value is republished
pub const FORM_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest draft value until input has been quiet for `quiet`,
/// then releases it unless it equals the last released value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    draft: Option<T>,
    last_emitted: Option<T>,
    deadline: Option<Instant>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            draft: None,
            last_emitted: None,
            deadline: None,
        }
    }

    /// Record a new draft and restart the quiet period
    pub fn push(&mut self, value: T, now: Instant) {
        self.draft = Some(value);
        self.deadline = Some(now + self.quiet);
    }

    /// Release the draft if the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {}
            _ => return None,
        }
        self.deadline = None;
        let draft = self.draft.take()?;
        if self.last_emitted.as_ref() == Some(&draft) {
            return None;
        }
        self.last_emitted = Some(draft.clone());
        Some(draft)
    }

    /// Drop any pending draft and treat `value` as already released
    pub fn reset_to(&mut self, value: T) {
        self.draft = None;
        self.deadline = None;
        self.last_emitted = Some(value);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending draft is due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

/// Suppresses consecutive duplicates of a value
#[derive(Debug, Clone, Default)]
pub struct Distinct<T> {
    last: Option<T>,
}

impl<T: Clone + PartialEq> Distinct<T> {
    /// Returns the value if it differs from the previous one
    pub fn next(&mut self, value: T) -> Option<T> {
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());
        Some(value)
    }

    pub fn set(&mut self, value: T) {
        self.last = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_before_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FORM_DEBOUNCE);
        debouncer.push(1, start);
        assert_eq!(debouncer.poll(start + ms(299)), None);
        assert!(debouncer.is_pending());
    }

    #[test]
    fn test_rapid_pushes_collapse() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FORM_DEBOUNCE);
        for i in 0..10u64 {
            debouncer.push(i, start + ms(i * 20));
            assert_eq!(debouncer.poll(start + ms(i * 20 + 10)), None);
        }
        assert_eq!(debouncer.poll(start + ms(180 + 300)), Some(9));
        assert_eq!(debouncer.poll(start + ms(2000)), None);
    }

    #[test]
    fn test_duplicate_is_suppressed() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FORM_DEBOUNCE);
        debouncer.push("a", start);
        assert_eq!(debouncer.poll(start + ms(300)), Some("a"));
        debouncer.push("b", start + ms(400));
        debouncer.push("a", start + ms(450));
        assert_eq!(debouncer.poll(start + ms(800)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reset_cancels_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FORM_DEBOUNCE);
        debouncer.push(5, start);
        debouncer.reset_to(0);
        assert_eq!(debouncer.poll(start + ms(1000)), None);
        debouncer.push(0, start + ms(1000));
        assert_eq!(debouncer.poll(start + ms(1300)), None);
    }

    #[test]
    fn test_time_until_due() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(FORM_DEBOUNCE);
        assert_eq!(debouncer.time_until_due(start), None);
        debouncer.push(1, start);
        assert_eq!(debouncer.time_until_due(start + ms(100)), Some(ms(200)));
    }

    #[test]
    fn test_distinct() {
        let mut distinct = Distinct::default();
        assert_eq!(distinct.next(false), Some(false));
        assert_eq!(distinct.next(false), None);
        assert_eq!(distinct.next(true), Some(true));
        distinct.set(false);
        assert_eq!(distinct.next(false), None);
    }
}
