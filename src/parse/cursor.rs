use std::iter::FusedIterator;

use crate::position::Position;

/// An element whose extent in the source text is known, so the cursor can keep
/// track of where it is.
pub trait Step {
    /// Given the position of `self`, returns the position right after it.
    fn step(&self, pos: Position) -> Position;
}

impl Step for char {
    fn step(&self, pos: Position) -> Position {
        pos.advance(*self)
    }
}

/// A forward-only cursor over a slice of characters or tokens.
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    items: &'a [T],
    idx: usize,
    pos: Position,
}

impl<'a, T: Step> Cursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self::with_start(items, Position::default())
    }

    pub fn with_start(items: &'a [T], start: Position) -> Self {
        Self {
            items,
            idx: 0,
            pos: start,
        }
    }

    /// Returns the position of the current element (or the end position once exhausted).
    pub fn pos(&self) -> Position {
        self.pos
    }

    /// Returns the number of elements consumed so far.
    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn is_exhausted(&self) -> bool {
        self.idx >= self.items.len()
    }

    pub fn current(&self) -> Option<&'a T> {
        self.items.get(self.idx)
    }

    /// Looks `n` elements ahead without consuming anything; `peek_nth(0)` is the current element.
    pub fn peek_nth(&self, n: usize) -> Option<&'a T> {
        self.items.get(self.idx + n)
    }

    pub fn remaining(&self) -> &'a [T] {
        self.items.get(self.idx..).unwrap_or_default()
    }

    pub fn advance(&mut self) {
        if let Some(item) = self.current() {
            self.pos = item.step(self.pos);
            self.idx += 1;
        }
    }

    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub fn advance_while(&mut self, predicate: impl FnMut(&T) -> bool) -> usize {
        self.collect_while(predicate).len()
    }

    pub fn collect_while(&mut self, mut predicate: impl FnMut(&T) -> bool) -> &'a [T] {
        let start = self.idx;

        while matches!(self.current(), Some(item) if predicate(item)) {
            self.advance();
        }

        &self.items[start..self.idx]
    }
}

impl<'a, T: Step> Iterator for Cursor<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.current()?;
        self.advance();

        Some(item)
    }
}

impl<'a, T: Step> FusedIterator for Cursor<'a, T> {}
