//! Bounded FIFO of pending animations.

use heapless::Deque;

/// Fixed-capacity first-in first-out queue.
///
/// Backed by a `heapless::Deque`, so every operation is O(1) and nothing is
/// allocated. A full queue rejects new items and hands them back.
#[derive(Debug, Clone)]
pub struct AnimationQueue<T, const N: usize> {
    items: Deque<T, N>,
}

impl<T, const N: usize> Default for AnimationQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> AnimationQueue<T, N> {
    pub fn new() -> Self {
        Self {
            items: Deque::new(),
        }
    }

    /// Appends `item` at the back. Returns it unchanged if the queue is full.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        self.items.push_back(item)
    }

    /// Removes the oldest item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The oldest item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Drops every queued item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_come_out_in_insertion_order() {
        let mut queue = AnimationQueue::<u32, 4>::new();
        for i in 1..=3 {
            queue.push(i).unwrap();
        }

        assert_eq!(queue.peek(), Some(&1));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        queue.push(4).unwrap();
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn push_beyond_capacity_returns_item() {
        let mut queue = AnimationQueue::<u32, 50>::new();
        for i in 0..50 {
            assert!(queue.push(i).is_ok());
        }

        assert!(queue.is_full());
        assert_eq!(queue.push(50), Err(50));
        assert_eq!(queue.len(), 50);
        assert_eq!(queue.capacity(), 50);
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = AnimationQueue::<u32, 8>::new();
        queue.push(1).unwrap();
        queue.push(2).unwrap();

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.peek(), None);
        assert!(queue.push(3).is_ok());
    }
}
