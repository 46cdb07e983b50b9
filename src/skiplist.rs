use crate::arena::{NodeArena, NodeId};
use crate::error::{Result, SkipListError};
use crate::level::{GeometricLevels, LevelGenerator, MAX_LEVEL};
use crate::range::ScoreRange;
use std::cmp::Ordering;
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// A forward link at one level of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SkipLevel {
    forward: Option<NodeId>,
    /// Number of nodes crossed by following `forward`, counting the target. When `forward` is
    /// `None` this is the number of nodes left until the end of the list.
    span: usize,
}

/// A node in the skip list.
#[derive(Debug)]
struct SkipNode<E> {
    score: f64,
    element: E,
    /// The previous node at level 0. `None` for the first node.
    backward: Option<NodeId>,
    /// Sized once at creation.
    levels: Vec<SkipLevel>,
}

impl<E: Ord> SkipNode<E> {
    fn new(score: f64, element: E, height: usize) -> Result<Self> {
        let mut levels = Vec::new();
        levels.try_reserve_exact(height)?;
        levels.resize(height, SkipLevel::default());

        Ok(SkipNode {
            score,
            element,
            backward: None,
            levels,
        })
    }

    /// Compare this node's `(score, element)` pair against another pair.
    fn cmp_key(&self, score: f64, element: &E) -> Ordering {
        if self.score < score {
            Ordering::Less
        } else if self.score > score {
            Ordering::Greater
        } else {
            self.element.cmp(element)
        }
    }

    /// Returns true if this node sorts strictly before `(score, element)`.
    fn precedes(&self, score: f64, element: &E) -> bool {
        self.cmp_key(score, element) == Ordering::Less
    }

    fn matches(&self, score: f64, element: &E) -> bool {
        self.score == score && self.element == *element
    }

    /// The next node at level 0.
    fn next(&self) -> Option<NodeId> {
        self.levels[0].forward
    }
}

/// A position in a search path. Searches start at the header, which is not a real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    Node(NodeId),
}

impl Cursor {
    fn node(self) -> Option<NodeId> {
        match self {
            Cursor::Head => None,
            Cursor::Node(id) => Some(id),
        }
    }
}

/// A skip list of `(score, element)` pairs kept in ascending score order, with ties broken by
/// element order.
///
/// Every link records how many nodes it skips over, which makes ranks available in expected
/// logarithmic time.
///
/// # Uniqueness
///
/// The list does not check for duplicate `(score, element)` pairs. Callers should keep a separate
/// index (usually a hash map from element to score) and consult it before inserting.
///
/// # Concurrency
///
/// There is no internal synchronization. Mutations take `&mut self`, so sharing a list across
/// threads requires an external lock.
#[derive(Debug)]
pub struct SkipList<E, G = GeometricLevels> {
    /// Links of the header. Only the first `level` entries are meaningful.
    head: [SkipLevel; MAX_LEVEL],
    nodes: NodeArena<SkipNode<E>>,
    tail: Option<NodeId>,
    length: usize,
    /// The highest level used by any node, or 1 when the list is empty.
    level: usize,
    level_generator: G,
}

impl<E: Ord> SkipList<E, GeometricLevels> {
    /// Create a new skip list with the default promotion probability of 0.25.
    ///
    /// # Examples
    /// ```
    /// use hopscotch_zset::SkipList;
    ///
    /// let mut skiplist = SkipList::<u64>::new();
    /// skiplist.insert(2.0, 20).unwrap();
    /// skiplist.insert(1.0, 10).unwrap();
    ///
    /// assert_eq!(skiplist.len(), 2);
    /// assert_eq!(skiplist.first(), Some((1.0, &10)));
    /// ```
    pub fn new() -> Self {
        Self::with_level_generator(GeometricLevels::default())
    }

    /// Create a new skip list whose node levels are drawn from a seeded RNG.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_level_generator(GeometricLevels::seeded(seed))
    }

    /// Create a new skip list with a custom promotion probability.
    pub fn with_probability(probability: f64, seed: Option<u64>) -> Result<Self> {
        let level_generator = GeometricLevels::new(Some(probability), seed)?;
        Ok(Self::with_level_generator(level_generator))
    }
}

impl<E: Ord> Default for SkipList<E, GeometricLevels> {
    fn default() -> Self {
        Self::new()
    }
}

// Public methods of SkipList
impl<E: Ord, G: LevelGenerator> SkipList<E, G> {
    /// Create a new skip list that draws node levels from `level_generator`.
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipList {
            head: [SkipLevel::default(); MAX_LEVEL],
            nodes: NodeArena::new(),
            tail: None,
            length: 0,
            level: 1,
            level_generator,
        }
    }

    /// The number of elements in the skip list.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true if the skip list does not hold any elements; otherwise false.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The highest level in use by any node. An empty list has height 1.
    pub fn height(&self) -> usize {
        self.level
    }

    /// Insert a `(score, element)` pair and return a handle to its node.
    ///
    /// The pair must not already be present. Equal scores are allowed and are ordered by element.
    ///
    /// # Errors
    ///
    /// Returns [`SkipListError::NanScore`] for a NaN score and [`SkipListError::OutOfMemory`] if
    /// the node cannot be allocated. The list is unchanged in both cases.
    pub fn insert(&mut self, score: f64, element: E) -> Result<NodeId> {
        if score.is_nan() {
            return Err(SkipListError::NanScore);
        }

        let (update, rank) = self.insert_path(score, &element);
        let height = self.level_generator.random_level().clamp(1, MAX_LEVEL);
        let id = self.nodes.alloc(SkipNode::new(score, element, height)?)?;
        self.link(id, update, rank);

        trace!(score, height, rank = rank[0] + 1, "inserted node");
        Ok(id)
    }

    /// Remove the node matching `(score, element)` exactly and drop it.
    ///
    /// Returns true if a node was found; otherwise the list is unchanged.
    pub fn delete(&mut self, score: f64, element: &E) -> bool {
        self.remove(score, element).is_some()
    }

    /// Remove the node matching `(score, element)` exactly and hand its contents back.
    pub fn remove(&mut self, score: f64, element: &E) -> Option<(f64, E)> {
        let update = self.search_path(score, element);
        let target = self.level_at(update[0], 0).forward?;
        if !self.nodes[target].matches(score, element) {
            return None;
        }

        self.unlink(target, &update);
        let node = self.nodes.free(target)?;
        trace!(score, "removed node");

        Some((node.score, node.element))
    }

    /// Move the node matching `(score, element)` to `new_score`.
    ///
    /// The node keeps its handle and its level. Returns `Ok(None)` if no node matched.
    pub fn update_score(
        &mut self,
        score: f64,
        element: &E,
        new_score: f64,
    ) -> Result<Option<NodeId>> {
        if new_score.is_nan() {
            return Err(SkipListError::NanScore);
        }

        let update = self.search_path(score, element);
        let target = match self.level_at(update[0], 0).forward {
            Some(id) if self.nodes[id].matches(score, element) => id,
            _ => return Ok(None),
        };

        // Only the score changes if the node would land in the same place.
        let node = &self.nodes[target];
        let after_prev = node
            .backward
            .map_or(true, |prev| self.nodes[prev].precedes(new_score, element));
        let before_next = node.next().map_or(true, |next| {
            self.nodes[next].cmp_key(new_score, element) == Ordering::Greater
        });
        if after_prev && before_next {
            self.nodes[target].score = new_score;
            return Ok(Some(target));
        }

        self.unlink(target, &update);
        self.nodes[target].score = new_score;
        let (update, rank) = self.insert_path(new_score, element);
        self.link(target, update, rank);

        Ok(Some(target))
    }

    /// Remove every node, leaving an empty list.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = [SkipLevel::default(); MAX_LEVEL];
        self.tail = None;
        self.length = 0;
        self.level = 1;
    }

    /// Get the score and element of a node.
    ///
    /// Returns `None` if the handle does not refer to a node in this list.
    pub fn get(&self, id: NodeId) -> Option<(f64, &E)> {
        self.nodes.get(id).map(|node| (node.score, &node.element))
    }

    pub fn score(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(id).map(|node| node.score)
    }

    pub fn element(&self, id: NodeId) -> Option<&E> {
        self.nodes.get(id).map(|node| &node.element)
    }

    /// The number of levels the node was created with.
    pub fn node_height(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(id).map(|node| node.levels.len())
    }

    /// Handle to the node with the lowest `(score, element)` pair.
    pub fn first_node(&self) -> Option<NodeId> {
        self.head[0].forward
    }

    /// Handle to the node with the highest `(score, element)` pair.
    pub fn last_node(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn first(&self) -> Option<(f64, &E)> {
        self.first_node().and_then(|id| self.get(id))
    }

    pub fn last(&self) -> Option<(f64, &E)> {
        self.last_node().and_then(|id| self.get(id))
    }

    /// A coarse check that `score` falls between the first and last scores of the list,
    /// inclusive. Always false for an empty list.
    pub fn is_in_range(&self, score: f64) -> bool {
        match (self.first(), self.last()) {
            (Some((first, _)), Some((last, _))) => first <= score && score <= last,
            _ => false,
        }
    }

    /// Returns true if some score in the list could satisfy `range`.
    pub fn overlaps_range(&self, range: &ScoreRange) -> bool {
        if range.is_empty() {
            return false;
        }

        match (self.first(), self.last()) {
            (Some((first, _)), Some((last, _))) => range.above_min(last) && range.below_max(first),
            _ => false,
        }
    }

    /// Handle to the first node with a score strictly greater than `score`.
    pub fn node_greater_than(&self, score: f64) -> Option<NodeId> {
        let (last, _) = self.last()?;
        if score.is_nan() || last <= score {
            return None;
        }

        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            // Go forward while out of range.
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if self.nodes[next].score > score {
                    break;
                }
                cursor = Cursor::Node(next);
            }
        }

        self.level_at(cursor, 0).forward
    }

    /// Handle to the last node with a score strictly less than `score`.
    pub fn node_less_than(&self, score: f64) -> Option<NodeId> {
        let (first, _) = self.first()?;
        if score.is_nan() || first >= score {
            return None;
        }

        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            // Go forward while in range.
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if self.nodes[next].score >= score {
                    break;
                }
                cursor = Cursor::Node(next);
            }
        }

        cursor.node()
    }

    /// Handle to the first node whose score lies in `range`.
    pub fn first_in_range(&self, range: &ScoreRange) -> Option<NodeId> {
        if !self.overlaps_range(range) {
            return None;
        }

        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if range.above_min(self.nodes[next].score) {
                    break;
                }
                cursor = Cursor::Node(next);
            }
        }

        // The range overlaps the list, so a successor exists. It may still lie past `max`.
        let candidate = self.level_at(cursor, 0).forward?;
        range
            .below_max(self.nodes[candidate].score)
            .then_some(candidate)
    }

    /// Handle to the last node whose score lies in `range`.
    pub fn last_in_range(&self, range: &ScoreRange) -> Option<NodeId> {
        if !self.overlaps_range(range) {
            return None;
        }

        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if !range.below_max(self.nodes[next].score) {
                    break;
                }
                cursor = Cursor::Node(next);
            }
        }

        let candidate = cursor.node()?;
        range
            .above_min(self.nodes[candidate].score)
            .then_some(candidate)
    }

    /// The 1-based position of `(score, element)` in the list, or `None` if it is not present.
    pub fn rank(&self, score: f64, element: &E) -> Option<usize> {
        let mut rank = 0;
        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if self.nodes[next].cmp_key(score, element) == Ordering::Greater {
                    break;
                }
                rank += self.level_at(cursor, level_idx).span;
                cursor = Cursor::Node(next);
            }

            if let Cursor::Node(id) = cursor {
                if self.nodes[id].matches(score, element) {
                    return Some(rank);
                }
            }
        }

        None
    }

    /// Handle to the node at the 1-based position `rank`.
    pub fn get_by_rank(&self, rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.length {
            return None;
        }

        let mut traversed = 0;
        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                let span = self.level_at(cursor, level_idx).span;
                if traversed + span > rank {
                    break;
                }
                traversed += span;
                cursor = Cursor::Node(next);
            }

            if traversed == rank {
                return cursor.node();
            }
        }

        None
    }

    /// An iterator visiting each node in ascending order.
    ///
    /// Returns values of (f64, &'a E)
    pub fn iter(&self) -> Iter<'_, E> {
        self.iter_from(self.first_node())
    }

    /// An iterator walking forward from `start`, inclusive.
    pub fn iter_from(&self, start: Option<NodeId>) -> Iter<'_, E> {
        Iter {
            nodes: &self.nodes,
            next: start.filter(|id| self.nodes.get(*id).is_some()),
            reverse: false,
        }
    }

    /// An iterator walking backward from `start`, inclusive.
    pub fn iter_rev_from(&self, start: Option<NodeId>) -> Iter<'_, E> {
        Iter {
            nodes: &self.nodes,
            next: start.filter(|id| self.nodes.get(*id).is_some()),
            reverse: true,
        }
    }
}

/// Bulk extraction of elements.
impl<E, G> SkipList<E, G>
where
    E: Ord + Clone,
    G: LevelGenerator,
{
    /// Append up to `limit` elements to `out`, walking forward from `start`.
    ///
    /// Returns the number of elements written.
    pub fn copy_forward(&self, start: Option<NodeId>, limit: usize, out: &mut Vec<E>) -> usize {
        let written = out.len();
        out.extend(
            self.iter_from(start)
                .take(limit)
                .map(|(_, element)| element.clone()),
        );
        out.len() - written
    }

    /// Like [`copy_forward`](Self::copy_forward), but stop before the first node whose score is
    /// at least `max_exclusive`.
    pub fn copy_forward_until(
        &self,
        start: Option<NodeId>,
        limit: usize,
        max_exclusive: f64,
        out: &mut Vec<E>,
    ) -> usize {
        let written = out.len();
        out.extend(
            self.iter_from(start)
                .take_while(|(score, _)| *score < max_exclusive)
                .take(limit)
                .map(|(_, element)| element.clone()),
        );
        out.len() - written
    }

    /// Append up to `limit` elements to `out`, walking backward from `start`.
    pub fn copy_backward(&self, start: Option<NodeId>, limit: usize, out: &mut Vec<E>) -> usize {
        let written = out.len();
        out.extend(
            self.iter_rev_from(start)
                .take(limit)
                .map(|(_, element)| element.clone()),
        );
        out.len() - written
    }

    /// Like [`copy_backward`](Self::copy_backward), but stop before the first node whose score is
    /// at most `min_exclusive`.
    pub fn copy_backward_until(
        &self,
        start: Option<NodeId>,
        limit: usize,
        min_exclusive: f64,
        out: &mut Vec<E>,
    ) -> usize {
        let written = out.len();
        out.extend(
            self.iter_rev_from(start)
                .take_while(|(score, _)| *score > min_exclusive)
                .take(limit)
                .map(|(_, element)| element.clone()),
        );
        out.len() - written
    }
}

// Private methods of SkipList
impl<E: Ord, G: LevelGenerator> SkipList<E, G> {
    fn level_at(&self, cursor: Cursor, level_idx: usize) -> &SkipLevel {
        match cursor {
            Cursor::Head => &self.head[level_idx],
            Cursor::Node(id) => &self.nodes[id].levels[level_idx],
        }
    }

    fn level_at_mut(&mut self, cursor: Cursor, level_idx: usize) -> &mut SkipLevel {
        match cursor {
            Cursor::Head => &mut self.head[level_idx],
            Cursor::Node(id) => &mut self.nodes[id].levels[level_idx],
        }
    }

    /// Find the last node before `(score, element)` on every active level.
    fn search_path(&self, score: f64, element: &E) -> [Cursor; MAX_LEVEL] {
        let mut update = [Cursor::Head; MAX_LEVEL];
        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if !self.nodes[next].precedes(score, element) {
                    break;
                }
                cursor = Cursor::Node(next);
            }
            update[level_idx] = cursor;
        }

        update
    }

    /// Like [`search_path`](Self::search_path), also recording the rank of each node on the path.
    fn insert_path(&self, score: f64, element: &E) -> ([Cursor; MAX_LEVEL], [usize; MAX_LEVEL]) {
        let mut update = [Cursor::Head; MAX_LEVEL];
        let mut rank = [0; MAX_LEVEL];
        let mut cursor = Cursor::Head;
        for level_idx in (0..self.level).rev() {
            rank[level_idx] = if level_idx == self.level - 1 {
                0
            } else {
                rank[level_idx + 1]
            };

            while let Some(next) = self.level_at(cursor, level_idx).forward {
                if !self.nodes[next].precedes(score, element) {
                    break;
                }
                rank[level_idx] += self.level_at(cursor, level_idx).span;
                cursor = Cursor::Node(next);
            }
            update[level_idx] = cursor;
        }

        (update, rank)
    }

    /// Splice the allocated but unlinked node `id` in after the nodes in `update`.
    fn link(&mut self, id: NodeId, mut update: [Cursor; MAX_LEVEL], mut rank: [usize; MAX_LEVEL]) {
        let height = self.nodes[id].levels.len();
        if height > self.level {
            // Nothing lives on the new levels yet, so the header skips the whole list.
            for level_idx in self.level..height {
                rank[level_idx] = 0;
                update[level_idx] = Cursor::Head;
                self.head[level_idx].span = self.length;
            }
            debug!(from = self.level, to = height, "raising skip list height");
            self.level = height;
        }

        for level_idx in 0..height {
            let crossed = rank[0] - rank[level_idx];
            let previous = self.level_at_mut(update[level_idx], level_idx);
            let forward = previous.forward.replace(id);
            let previous_span = previous.span;
            previous.span = crossed + 1;

            self.nodes[id].levels[level_idx] = SkipLevel {
                forward,
                span: previous_span - crossed,
            };
        }

        // Levels above the new node now skip one more node.
        for level_idx in height..self.level {
            self.level_at_mut(update[level_idx], level_idx).span += 1;
        }

        self.nodes[id].backward = update[0].node();
        match self.nodes[id].next() {
            Some(next) => self.nodes[next].backward = Some(id),
            None => self.tail = Some(id),
        }
        self.length += 1;
    }

    /// Unlink `target` without releasing it. `update` must be the search path to `target`.
    fn unlink(&mut self, target: NodeId, update: &[Cursor; MAX_LEVEL]) {
        for level_idx in 0..self.level {
            if self.level_at(update[level_idx], level_idx).forward == Some(target) {
                let SkipLevel { forward, span } = self.nodes[target].levels[level_idx];
                let previous = self.level_at_mut(update[level_idx], level_idx);
                previous.span = previous.span + span - 1;
                previous.forward = forward;
            } else {
                self.level_at_mut(update[level_idx], level_idx).span -= 1;
            }
        }

        let backward = self.nodes[target].backward;
        match self.nodes[target].next() {
            Some(next) => self.nodes[next].backward = backward,
            None => self.tail = backward,
        }

        while self.level > 1 && self.head[self.level - 1].forward.is_none() {
            self.level -= 1;
            debug!(to = self.level, "lowering skip list height");
        }
        self.length -= 1;
    }
}

/// An iterator over the nodes of a [`SkipList`], in either direction.
///
/// This `struct` is created by the [`iter`], [`iter_from`] and [`iter_rev_from`] methods.
///
/// [`iter`]: SkipList::iter
/// [`iter_from`]: SkipList::iter_from
/// [`iter_rev_from`]: SkipList::iter_rev_from
pub struct Iter<'a, E> {
    nodes: &'a NodeArena<SkipNode<E>>,
    next: Option<NodeId>,
    reverse: bool,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = (f64, &'a E);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.nodes[id];
        self.next = if self.reverse {
            node.backward
        } else {
            node.levels[0].forward
        };

        Some((node.score, &node.element))
    }
}

impl<E> FusedIterator for Iter<'_, E> {}

impl<'a, E: Ord, G: LevelGenerator> IntoIterator for &'a SkipList<E, G> {
    type Item = (f64, &'a E);
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Iter<'a, E> {
        self.iter()
    }
}
