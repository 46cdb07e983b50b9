//! Index-addressed storage for skip list nodes.
//!
//! Links between nodes are [`NodeId`]s into a single growable store owned by the list, so the
//! list can hold forward and backward links without raw pointers or reference counting.

use crate::error::Result;
use std::ops::{Index, IndexMut};

/// A handle to a node in a skip list.
///
/// A handle stays valid until its node is removed. After that the slot may be reused by a later
/// insert, so callers must not hold on to handles of removed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Slab of nodes with a free list for recycling removed slots.
#[derive(Debug)]
pub(crate) struct NodeArena<N> {
    slots: Vec<Option<N>>,
    free_list: Vec<NodeId>,
}

impl<N> NodeArena<N> {
    pub(crate) fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store `node` and return its handle.
    ///
    /// Fails without modifying the arena if the store cannot grow.
    pub(crate) fn alloc(&mut self, node: N) -> Result<NodeId> {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.0] = Some(node);
            return Ok(id);
        }

        self.slots.try_reserve(1)?;
        // Keep room for every slot on the free list so `free` never has to allocate.
        let free_capacity = self.slots.len() + 1 - self.free_list.len();
        self.free_list.try_reserve(free_capacity)?;

        let id = NodeId(self.slots.len());
        self.slots.push(Some(node));
        Ok(id)
    }

    /// Release the node behind `id`, returning it to the caller.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<N> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id);
        Some(node)
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&N> {
        self.slots.get(id.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.slots.get_mut(id.0)?.as_mut()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<N> Index<NodeId> for NodeArena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{id:?} does not refer to a live node"),
        }
    }
}

impl<N> IndexMut<NodeId> for NodeArena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("{id:?} does not refer to a live node"),
        }
    }
}
