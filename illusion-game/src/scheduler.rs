//! Virtual-time task scheduler: one-shot and repeating registrations with
//! cancellation handles. The engine is the only driver of time; tasks fire
//! when it drains the queue, earliest deadline first, registration order
//! breaking ties. A task scheduled while another is being dispatched lands
//! behind it in the queue and never pre-empts it.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Opaque handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// A task popped from the queue, stamped with its nominal fire time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueTask<T> {
    pub id: TaskId,
    pub fire_at: u64,
    pub task: T,
}

#[derive(Debug)]
struct Entry<T> {
    fire_at: u64,
    seq: u64,
    id: TaskId,
    task: T,
    repeat_every: Option<u64>,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the BinaryHeap pops the earliest (fire_at, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

#[derive(Debug)]
pub struct Scheduler<T> {
    queue: BinaryHeap<Entry<T>>,
    cancelled: HashSet<TaskId>,
    live: HashSet<TaskId>,
    next_id: u64,
    next_seq: u64,
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            live: HashSet::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Register a one-shot task firing `delay` ms after `now`.
    pub fn schedule_once(&mut self, now: u64, delay: u64, task: T) -> TaskId {
        self.push(now + delay, task, None)
    }

    /// Register a repeating task; first fire is `period` ms after `now`.
    /// Re-arms on its nominal cadence, so no drift accumulates.
    pub fn schedule_every(&mut self, now: u64, period: u64, task: T) -> TaskId {
        self.push(now + period, task, Some(period))
    }

    /// Cancel a pending task. Returns false when the handle is unknown or
    /// the task already fired.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if self.live.remove(&id) {
            self.cancelled.insert(id);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.live.contains(&id)
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Pop the next task due at or before `now`, re-arming repeating tasks.
    pub fn pop_due(&mut self, now: u64) -> Option<DueTask<T>> {
        loop {
            if self.queue.peek()?.fire_at > now {
                return None;
            }
            let entry = self.queue.pop()?;
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            if let Some(period) = entry.repeat_every {
                let seq = self.bump_seq();
                self.queue.push(Entry {
                    fire_at: entry.fire_at + period,
                    seq,
                    id: entry.id,
                    task: entry.task.clone(),
                    repeat_every: Some(period),
                });
            } else {
                self.live.remove(&entry.id);
            }
            return Some(DueTask {
                id: entry.id,
                fire_at: entry.fire_at,
                task: entry.task,
            });
        }
    }

    fn push(&mut self, fire_at: u64, task: T, repeat_every: Option<u64>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.live.insert(id);
        self.queue.push(Entry {
            fire_at,
            seq,
            id,
            task,
            repeat_every,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
