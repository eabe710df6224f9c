//! Delayed continuations driven by frame time
//!
//! Nothing in the narrative blocks: "wait two seconds, then start the game"
//! is a payload scheduled two seconds out and handed back by
//! [`Schedule::advance`] on the frame it comes due.

#[derive(Debug)]
struct Entry<T> {
    due: f32,
    /// Insertion order, so entries due together fire in the order scheduled
    seq: u64,
    payload: T,
}

#[derive(Debug)]
pub struct Schedule<T> {
    now: f32,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    /// Deliver `payload` once `delay` seconds of frame time have passed
    pub fn schedule(&mut self, delay: f32, payload: T) {
        self.entries.push(Entry {
            due: self.now + delay.max(0.0),
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
    }

    /// Move the clock forward and return everything now due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0);
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|e| e.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Seconds of frame time seen so far
    pub fn now(&self) -> f32 {
        self.now
    }
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_when_due() {
        let mut schedule = Schedule::new();
        schedule.schedule(1.0, "a");
        assert!(schedule.advance(0.5).is_empty());
        assert_eq!(schedule.advance(0.5), vec!["a"]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_due_order_then_insertion_order() {
        let mut schedule = Schedule::new();
        schedule.schedule(2.0, "late");
        schedule.schedule(1.0, "first");
        schedule.schedule(1.0, "second");
        assert_eq!(schedule.advance(5.0), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut schedule = Schedule::new();
        schedule.advance(10.0);
        schedule.schedule(1.0, 7);
        assert!(schedule.advance(0.75).is_empty());
        assert_eq!(schedule.advance(0.25), vec![7]);
        assert_eq!(schedule.now(), 11.0);
    }
}
