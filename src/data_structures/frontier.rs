//! Frontiers, the discovered-but-unprocessed set of a traversal.
//!
//! The order in which a Frontier hands states back is what tells a
//! breadth-first traversal (FIFO) apart from a depth-first one (LIFO).

use std::collections::VecDeque;
use std::fmt::Debug;

pub trait Frontier<St>: Debug + Default {
    fn push(&mut self, s: St);
    fn pop(&mut self) -> Option<St>;
    fn len(&self) -> usize;
    fn clear(&mut self);

    #[inline(always)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First-in, first-out Frontier.
#[derive(Debug)]
pub struct Queue<St> {
    items: VecDeque<St>,
}

impl<St> Default for Queue<St> {
    fn default() -> Self {
        Self {
            items: VecDeque::with_capacity(64),
        }
    }
}

impl<St: Debug> Frontier<St> for Queue<St> {
    #[inline(always)]
    fn push(&mut self, s: St) {
        self.items.push_back(s);
    }
    #[inline(always)]
    fn pop(&mut self) -> Option<St> {
        self.items.pop_front()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.items.len()
    }
    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Last-in, first-out Frontier.
#[derive(Debug)]
pub struct Stack<St> {
    items: Vec<St>,
}

impl<St> Default for Stack<St> {
    fn default() -> Self {
        Self {
            items: Vec::with_capacity(64),
        }
    }
}

impl<St: Debug> Frontier<St> for Stack<St> {
    #[inline(always)]
    fn push(&mut self, s: St) {
        self.items.push(s);
    }
    #[inline(always)]
    fn pop(&mut self) -> Option<St> {
        self.items.pop()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.items.len()
    }
    fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<F: Frontier<u32>>(mut f: F) -> Vec<u32> {
        for i in 1..=4 {
            f.push(i);
        }
        assert_eq!(f.len(), 4);
        let mut out = vec![];
        while let Some(i) = f.pop() {
            out.push(i);
        }
        assert!(f.is_empty());
        out
    }

    #[test]
    fn queue_is_fifo() {
        assert_eq!(drain(Queue::default()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn stack_is_lifo() {
        assert_eq!(drain(Stack::default()), vec![4, 3, 2, 1]);
    }

    #[test]
    fn clear_empties() {
        let mut q = Queue::default();
        q.push(1u32);
        q.push(2u32);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }
}
