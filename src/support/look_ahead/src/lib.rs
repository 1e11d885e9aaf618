use derive_more::Deref;
use std::collections::VecDeque;

/// Iterator adapter with unbounded look-ahead and push-back.
#[derive(Deref)]
pub struct LookAhead<I>
where
    I: Iterator,
{
    #[deref]
    iterator: I,

    buffer: VecDeque<I::Item>,
}

impl<I: Iterator<Item: Clone> + Clone> Clone for LookAhead<I> {
    fn clone(&self) -> Self {
        Self {
            iterator: self.iterator.clone(),
            buffer: self.buffer.clone(),
        }
    }
}

impl<I> LookAhead<I>
where
    I: Iterator,
{
    pub fn new(iterator: I) -> Self {
        Self {
            iterator,
            buffer: VecDeque::with_capacity(4),
        }
    }

    pub fn peek(&mut self) -> Option<&I::Item> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&mut self, index: usize) -> Option<&I::Item> {
        self.fill(index);
        self.buffer.get(index)
    }

    pub fn peek_nth_mut(&mut self, index: usize) -> Option<&mut I::Item> {
        self.fill(index);
        self.buffer.get_mut(index)
    }

    pub fn is_exhausted(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Consumes the next item only when it satisfies `predicate`.
    pub fn next_if(&mut self, predicate: impl FnOnce(&I::Item) -> bool) -> Option<I::Item> {
        if self.peek().is_some_and(predicate) {
            self.next()
        } else {
            None
        }
    }

    // Puts an item back at the front, so the next call to `next` yields it again.
    pub fn unadvance(&mut self, item: I::Item) {
        self.buffer.push_front(item);
    }

    fn fill(&mut self, index: usize) {
        while self.buffer.len() <= index {
            match self.iterator.next() {
                Some(value) => self.buffer.push_back(value),
                None => break,
            }
        }
    }
}

impl<I: Iterator> Iterator for LookAhead<I>
where
    I: Iterator,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.pop_front().or_else(|| self.iterator.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut input = LookAhead::new([1, 2, 3].into_iter());
        assert_eq!(input.peek_nth(2), Some(&3));
        assert_eq!(input.peek(), Some(&1));
        assert_eq!(input.next(), Some(1));
        assert_eq!(input.peek_nth(5), None);
    }

    #[test]
    fn unadvance_and_next_if() {
        let mut input = LookAhead::new([1, 2].into_iter());
        assert_eq!(input.next_if(|n| *n == 2), None);
        let first = input.next();
        assert_eq!(first, Some(1));
        input.unadvance(7);
        assert_eq!(input.next_if(|n| *n == 7), Some(7));
        assert_eq!(input.next(), Some(2));
        assert!(input.is_exhausted());
    }
}
