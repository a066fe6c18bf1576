use std::hash::Hash;

use hashlink::LinkedHashSet;

/// Bounded insertion-ordered set.
///
/// Backs the FIFO replacer: every resident page appears at most once and the
/// head is always the oldest arrival.
#[derive(Debug)]
pub struct FifoQueue<ID: Eq + Hash + Copy> {
    entries: LinkedHashSet<ID>,
    capacity: usize,
}

impl<ID: Eq + Hash + Copy> FifoQueue<ID> {
    pub fn new(capacity: usize) -> Self {
        FifoQueue {
            entries: LinkedHashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends at the tail. Returns false, leaving the queue untouched, if the
    /// entry is already queued or the queue is full.
    pub fn push_back(&mut self, entry_id: ID) -> bool {
        if self.entries.len() == self.capacity || self.entries.contains(&entry_id) {
            return false;
        }
        self.entries.insert(entry_id)
    }

    pub fn pop_front(&mut self) -> Option<ID> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&ID> {
        self.entries.front()
    }

    pub fn contains(&self, entry_id: &ID) -> bool {
        self.entries.contains(entry_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &ID> {
        self.entries.iter()
    }
}

#[cfg(test)]
pub mod test {
    use super::FifoQueue;

    #[test]
    fn fifo_queue_test() {
        let mut queue: FifoQueue<u32> = FifoQueue::new(3);

        assert!(queue.push_back(4));
        assert!(queue.push_back(7));

        // Duplicates are rejected and do not move the entry
        assert!(!queue.push_back(4));
        assert_eq!(2, queue.len());
        assert_eq!(Some(&4), queue.front());

        assert!(queue.push_back(1));
        assert!(!queue.push_back(9), "queue is at capacity");

        assert_eq!(vec![4, 7, 1], queue.iter().copied().collect::<Vec<_>>());

        assert_eq!(Some(4), queue.pop_front());
        assert!(!queue.contains(&4));
        assert!(queue.push_back(4));
        assert_eq!(vec![7, 1, 4], queue.iter().copied().collect::<Vec<_>>());

        assert_eq!(Some(7), queue.pop_front());
        assert_eq!(Some(1), queue.pop_front());
        assert_eq!(Some(4), queue.pop_front());
        assert_eq!(None, queue.pop_front());
        assert!(queue.is_empty());
    }
}
