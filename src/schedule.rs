use std::time::{Duration, Instant};

/// One-shot piece of work due at a deadline. The owner polls it from the
/// event loop; dropping it cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<T> {
    due: Instant,
    payload: T,
}

impl<T> Deferred<T> {
    pub fn after(delay: Duration, now: Instant, payload: T) -> Self {
        Deferred {
            due: now + delay,
            payload,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

/// Removes and returns every payload whose deadline has passed, in
/// scheduling order.
pub fn drain_due<T>(queue: &mut Vec<Deferred<T>>, now: Instant) -> Vec<T> {
    let (due, pending): (Vec<_>, Vec<_>) = queue.drain(..).partition(|d| d.is_due(now));
    *queue = pending;
    due.into_iter().map(Deferred::into_payload).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn becomes_due_after_delay() {
        let now = Instant::now();
        let task = Deferred::after(Duration::from_millis(500), now, "reply");
        assert!(!task.is_due(now));
        assert!(!task.is_due(now + Duration::from_millis(499)));
        assert!(task.is_due(now + Duration::from_millis(500)));
        assert_eq!(task.into_payload(), "reply");
    }

    #[test]
    fn drain_keeps_pending_entries() {
        let now = Instant::now();
        let mut queue = vec![
            Deferred::after(Duration::from_millis(100), now, 1),
            Deferred::after(Duration::from_millis(900), now, 2),
            Deferred::after(Duration::from_millis(200), now, 3),
        ];
        let fired = drain_due(&mut queue, now + Duration::from_millis(300));
        assert_eq!(fired, vec![1, 3]);
        assert_eq!(queue.len(), 1);
        assert!(drain_due(&mut queue, now).is_empty());
    }
}
