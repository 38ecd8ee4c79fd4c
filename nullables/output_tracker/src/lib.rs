//! Records values emitted by production code so tests can assert on side effects
//! without mocking.

use std::sync::{Arc, Mutex, Weak};

/// Collects every value emitted after it was created
pub struct OutputTrackerMt<T: Clone> {
    output: Mutex<Vec<T>>,
}

impl<T: Clone> OutputTrackerMt<T> {
    fn new() -> Self {
        Self {
            output: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, value: T) {
        self.output.lock().unwrap().push(value);
    }

    pub fn output(&self) -> Vec<T> {
        self.output.lock().unwrap().clone()
    }

    /// Returns the collected values and starts over
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.output.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.output.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fans emitted values out to all live trackers. Trackers stop
/// receiving values when the last `Arc` to them is dropped.
pub struct OutputListenerMt<T: Clone> {
    trackers: Mutex<Vec<Weak<OutputTrackerMt<T>>>>,
}

impl<T: Clone> OutputListenerMt<T> {
    pub fn new() -> Self {
        Self {
            trackers: Mutex::new(Vec::new()),
        }
    }

    pub fn track(&self) -> Arc<OutputTrackerMt<T>> {
        let tracker = Arc::new(OutputTrackerMt::new());
        self.trackers.lock().unwrap().push(Arc::downgrade(&tracker));
        tracker
    }

    pub fn is_tracked(&self) -> bool {
        self.tracker_count() > 0
    }

    pub fn emit(&self, value: T) {
        let mut trackers = self.trackers.lock().unwrap();
        if trackers.is_empty() {
            return;
        }
        trackers.retain(|weak| match weak.upgrade() {
            Some(tracker) => {
                tracker.push(value.clone());
                true
            }
            None => false,
        });
    }

    pub fn tracker_count(&self) -> usize {
        let mut trackers = self.trackers.lock().unwrap();
        trackers.retain(|weak| weak.strong_count() > 0);
        trackers.len()
    }
}

impl<T: Clone> Default for OutputListenerMt<T> {
    fn default() -> Self {
        Self::new()
    }
}
