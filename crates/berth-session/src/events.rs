use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A notification stream with explicit observer registration.
///
/// Observers subscribe and get an unbounded receiver; emitting delivers the
/// value to every live observer. Observers that dropped their receiver are
/// pruned on the next emit, so a stream never accumulates dead senders.
pub struct EventStream<T> {
    senders: Vec<UnboundedSender<T>>,
}

impl<T: Clone> EventStream<T> {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
        }
    }

    /// Register an observer. Values emitted after this call are delivered
    /// on the returned receiver.
    pub fn subscribe(&mut self) -> UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver `value` to every live observer.
    pub fn emit(&mut self, value: T) {
        self.senders.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Number of observers still holding a receiver (as of the last emit).
    pub fn observer_count(&self) -> usize {
        self.senders.len()
    }
}

impl<T: Clone> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_and_emit() {
        let mut stream = EventStream::new();
        let mut a = stream.subscribe();
        let mut b = stream.subscribe();

        stream.emit(7u32);

        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn test_emit_with_no_observers() {
        let mut stream: EventStream<u32> = EventStream::new();
        stream.emit(1);
        assert_eq!(stream.observer_count(), 0);
    }

    #[test]
    fn test_dropped_observer_is_pruned() {
        let mut stream = EventStream::new();
        let rx = stream.subscribe();
        let mut keep = stream.subscribe();
        drop(rx);

        stream.emit("x");

        assert_eq!(stream.observer_count(), 1);
        assert_eq!(keep.try_recv().unwrap(), "x");
    }

    #[test]
    fn test_late_subscriber_misses_earlier_values() {
        let mut stream = EventStream::new();
        stream.emit(1u32);
        let mut late = stream.subscribe();
        stream.emit(2);
        assert_eq!(late.try_recv().unwrap(), 2);
        assert!(late.try_recv().is_err());
    }
}
