//! Doubly linked info list backed by a generational arena.
//!
//! Every list owns its own slot arena. `prev`/`next` links are arena indices,
//! so removing a record can never leave a dangling neighbour, and handles of
//! removed records fail the lookup instead of aliasing a new record.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::flow::Flow;
use crate::domain::render::RenderStyle;

static NEXT_LIST_ID: AtomicU64 = AtomicU64::new(1);

/// Handle of a record inside one specific [`InfoList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    list: u64,
    index: Index,
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "r{}.{}@list{}", slot, generation, self.list)
    }
}

/// Walking direction of a list traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// head -> tail
    #[default]
    Forward,
    /// tail -> head
    Backward,
}

impl Direction {
    pub fn from_backward(backward: bool) -> Self {
        if backward {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

#[derive(Debug)]
struct Link<T> {
    value: T,
    prev: Option<Index>,
    next: Option<Index>,
}

/// Doubly linked, head/tail tracked sequence of records.
#[derive(Debug)]
pub struct InfoList<T> {
    id: u64,
    slots: Arena<Link<T>>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl<T> Default for InfoList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InfoList<T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed),
            slots: Arena::new(),
            head: None,
            tail: None,
        }
    }

    fn handle(&self, index: Index) -> RecordId {
        RecordId {
            list: self.id,
            index,
        }
    }

    fn resolve(&self, id: RecordId) -> DomainResult<Index> {
        if id.list == self.id && self.slots.contains(id.index) {
            Ok(id.index)
        } else {
            Err(DomainError::UnknownRecord(id))
        }
    }

    fn link(&self, id: RecordId) -> Option<&Link<T>> {
        self.resolve(id).ok().and_then(|index| self.slots.get(index))
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.resolve(id).is_ok()
    }

    pub fn head(&self) -> Option<RecordId> {
        self.head.map(|index| self.handle(index))
    }

    pub fn tail(&self) -> Option<RecordId> {
        self.tail.map(|index| self.handle(index))
    }

    /// Successor of `id`, `None` for the tail and for foreign handles.
    pub fn next(&self, id: RecordId) -> Option<RecordId> {
        self.link(id)?.next.map(|index| self.handle(index))
    }

    /// Predecessor of `id`, `None` for the head and for foreign handles.
    pub fn prev(&self, id: RecordId) -> Option<RecordId> {
        self.link(id)?.prev.map(|index| self.handle(index))
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.link(id).map(|link| &link.value)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        let index = self.resolve(id).ok()?;
        self.slots.get_mut(index).map(|link| &mut link.value)
    }

    pub fn first(&self) -> Option<&T> {
        self.head.and_then(|index| self.slots.get(index)).map(|link| &link.value)
    }

    pub fn last(&self) -> Option<&T> {
        self.tail.and_then(|index| self.slots.get(index)).map(|link| &link.value)
    }

    /// Appends `value` at the tail end.
    #[instrument(level = "trace", skip_all, fields(list = self.id))]
    pub fn append(&mut self, value: T) -> RecordId {
        let index = self.slots.insert(Link {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(tail) => self.slots[tail].next = Some(index),
            None => self.head = Some(index),
        }
        self.tail = Some(index);
        trace!(record = %self.handle(index), "appended");
        self.handle(index)
    }

    /// Inserts `value` directly after `anchor`, moving the tail if `anchor` was the tail.
    #[instrument(level = "trace", skip(self, value), fields(list = self.id))]
    pub fn insert_after(&mut self, anchor: RecordId, value: T) -> DomainResult<RecordId> {
        let anchor_index = self.resolve(anchor)?;
        let successor = self.slots[anchor_index].next;
        if successor.is_none() && self.tail != Some(anchor_index) {
            return Err(DomainError::list_invariant(
                "insert_after",
                format!("anchor {} has no successor but is not the tail", anchor),
            ));
        }

        let index = self.slots.insert(Link {
            value,
            prev: Some(anchor_index),
            next: successor,
        });
        self.slots[anchor_index].next = Some(index);
        match successor {
            Some(next) => self.slots[next].prev = Some(index),
            None => self.tail = Some(index),
        }
        trace!(record = %self.handle(index), "inserted");
        Ok(self.handle(index))
    }

    /// Unlinks `id` and hands its value back to the caller.
    #[instrument(level = "trace", skip(self), fields(list = self.id))]
    pub fn delete(&mut self, id: RecordId) -> DomainResult<T> {
        let index = self.resolve(id)?;
        let (prev, next) = {
            let link = &self.slots[index];
            (link.prev, link.next)
        };
        if prev.is_none() && self.head != Some(index) {
            return Err(DomainError::list_invariant(
                "delete",
                format!("record {} has no predecessor but is not the head", id),
            ));
        }
        if next.is_none() && self.tail != Some(index) {
            return Err(DomainError::list_invariant(
                "delete",
                format!("record {} has no successor but is not the tail", id),
            ));
        }

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        let link = self
            .slots
            .remove(index)
            .ok_or(DomainError::UnknownRecord(id))?;
        trace!(record = %id, "deleted");
        Ok(link.value)
    }

    /// Applies `action` to every value in `direction` order.
    ///
    /// Returning `ControlFlow::Break` from `action` stops the walk; the break
    /// value is passed back out.
    pub fn traverse<F, R>(&self, direction: Direction, mut action: F) -> ControlFlow<R::Break>
    where
        F: FnMut(&T) -> R,
        R: Flow,
    {
        let mut cursor = match direction {
            Direction::Forward => self.head,
            Direction::Backward => self.tail,
        };
        while let Some(index) = cursor {
            let link = &self.slots[index];
            if let ControlFlow::Break(value) = action(&link.value).into_flow() {
                return ControlFlow::Break(value);
            }
            cursor = match direction {
                Direction::Forward => link.next,
                Direction::Backward => link.prev,
            };
        }
        ControlFlow::Continue(())
    }

    /// Number of records, counted by walking the chain.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let _ = self.traverse(Direction::Forward, |_| count += 1);
        count
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Forward iterator over the values.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    /// Forward iterator over the record handles.
    pub fn ids(&self) -> Ids<'_, T> {
        Ids {
            list: self,
            cursor: self.head,
        }
    }

    /// Joins the values with the style's separator, or the empty-list token.
    pub fn render(&self, style: &RenderStyle) -> String
    where
        T: fmt::Display,
    {
        if self.is_empty() {
            style.empty_list.clone()
        } else {
            self.iter().join(&style.separator)
        }
    }

    /// Walks the chain in both directions and reports the first broken invariant.
    pub fn validate(&self) -> DomainResult<()> {
        match (self.head, self.tail) {
            (None, None) if self.slots.is_empty() => return Ok(()),
            (None, None) => {
                return Err(DomainError::list_invariant(
                    "validate",
                    format!("empty list still holds {} records", self.slots.len()),
                ))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(DomainError::list_invariant(
                    "validate",
                    "exactly one endpoint is set",
                ))
            }
            (Some(_), Some(_)) => {}
        }

        let forward = self.walk(Direction::Forward)?;
        let backward = self.walk(Direction::Backward)?;
        if forward.len() != self.slots.len() {
            return Err(DomainError::list_invariant(
                "validate",
                format!(
                    "forward chain reaches {} of {} records",
                    forward.len(),
                    self.slots.len()
                ),
            ));
        }
        if !forward.iter().eq(backward.iter().rev()) {
            return Err(DomainError::list_invariant(
                "validate",
                "forward and backward chains disagree",
            ));
        }
        Ok(())
    }

    fn walk(&self, direction: Direction) -> DomainResult<Vec<Index>> {
        let (start, end) = match direction {
            Direction::Forward => (self.head, self.tail),
            Direction::Backward => (self.tail, self.head),
        };
        let mut seen = Vec::with_capacity(self.slots.len());
        let mut previous = None;
        let mut cursor = start;
        while let Some(index) = cursor {
            if seen.len() == self.slots.len() {
                return Err(DomainError::list_invariant(
                    "validate",
                    format!("{} chain does not terminate", direction),
                ));
            }
            let link = self.slots.get(index).ok_or_else(|| {
                DomainError::list_invariant("validate", format!("{} chain dangles", direction))
            })?;
            let back = match direction {
                Direction::Forward => link.prev,
                Direction::Backward => link.next,
            };
            if back != previous {
                return Err(DomainError::list_invariant(
                    "validate",
                    format!(
                        "record {} points back to the wrong neighbour",
                        self.handle(index)
                    ),
                ));
            }
            seen.push(index);
            previous = Some(index);
            cursor = match direction {
                Direction::Forward => link.next,
                Direction::Backward => link.prev,
            };
        }
        if previous != end {
            return Err(DomainError::list_invariant(
                "validate",
                format!("{} chain stops before the far endpoint", direction),
            ));
        }
        Ok(seen)
    }
}

impl<T: fmt::Display> fmt::Display for InfoList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderStyle::default()))
    }
}

impl<T> FromIterator<T> for InfoList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = InfoList::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for InfoList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a InfoList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, T> {
    list: &'a InfoList<T>,
    cursor: Option<Index>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.list.slots.get(self.cursor?)?;
        self.cursor = link.next;
        Some(&link.value)
    }
}

pub struct Ids<'a, T> {
    list: &'a InfoList<T>,
    cursor: Option<Index>,
}

impl<'a, T> Iterator for Ids<'a, T> {
    type Item = RecordId;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let link = self.list.slots.get(index)?;
        self.cursor = link.next;
        Some(self.list.handle(index))
    }
}
