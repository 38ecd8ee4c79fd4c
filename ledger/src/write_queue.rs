use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Condvar, Mutex,
    },
};

/** Distinct areas write locking is done, order is irrelevant */
#[derive(FromPrimitive, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Writer {
    ProcessBlock,
    Unchecked,
    Testing, // Used in tests to emulate a write lock
}

/// Holds the head of the write queue until it is released or dropped
pub struct WriteGuard {
    ticket: u64,
    data: Option<Arc<WriteQueueData>>,
}

impl WriteGuard {
    pub fn release(&mut self) {
        if let Some(data) = self.data.take() {
            let mut queue = data.queue.lock().unwrap();
            queue.retain(|(ticket, _)| *ticket != self.ticket);
            drop(queue);
            data.condition.notify_all();
        }
    }

    pub fn is_owned(&self) -> bool {
        self.data.is_some()
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.release();
    }
}

struct WriteQueueData {
    queue: Mutex<VecDeque<(u64, Writer)>>,
    next_ticket: AtomicU64,
    condition: Condvar,
}

/// Serializes writers in arrival order. Two writers of the same kind get separate slots.
pub struct WriteQueue {
    data: Arc<WriteQueueData>,
}

impl WriteQueue {
    pub fn new() -> Self {
        Self {
            data: Arc::new(WriteQueueData {
                queue: Mutex::new(VecDeque::new()),
                next_ticket: AtomicU64::new(0),
                condition: Condvar::new(),
            }),
        }
    }

    /// Blocks until we are at the head of the queue and blocks other waiters until write_guard goes out of scope
    pub fn wait(&self, writer: Writer) -> WriteGuard {
        let ticket = self.data.next_ticket.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.data.queue.lock().unwrap();
        queue.push_back((ticket, writer));

        let _queue = self
            .data
            .condition
            .wait_while(queue, |queue| {
                queue.front().map(|(t, _)| *t) != Some(ticket)
            })
            .unwrap();

        WriteGuard {
            ticket,
            data: Some(Arc::clone(&self.data)),
        }
    }

    /// Returns true if this writer is anywhere in the queue
    pub fn contains(&self, writer: Writer) -> bool {
        self.data
            .queue
            .lock()
            .unwrap()
            .iter()
            .any(|(_, w)| *w == writer)
    }

    pub fn len(&self) -> usize {
        self.data.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WriteQueue {
    fn default() -> Self {
        Self::new()
    }
}
