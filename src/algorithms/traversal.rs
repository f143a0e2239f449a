//! Implementation of uninformed traversals, breadth-first and depth-first.
//!
//! Both are the same algorithm. Only the order in which the Frontier gives
//! discovered states back differs.

use std::cmp::max;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::data_structures::frontier::Frontier;
use crate::data_structures::frontier::Queue;
use crate::data_structures::frontier::Stack;
use crate::search::SearchMarks;
use crate::search::reconstruct_path;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// What a single step of a traversal produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraversalEvent<St, A>
where
    St: State,
    A: Action,
{
    /// A state other than start and goal was taken out of the Frontier.
    Visited(St),
    /// The goal was taken out of the Frontier.
    Found(Path<St, A>),
    /// The Frontier ran dry without reaching the goal.
    Exhausted,
}

/// How a traversal ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalOutcome<St, A>
where
    St: State,
    A: Action,
{
    /// The path found, if any.
    pub path: Option<Path<St, A>>,
    /// States taken out of the Frontier, start and goal included.
    pub expanded: usize,
    /// Largest size the Frontier reached.
    pub peak_frontier: usize,
}

/// A traversal from `start` to `goal` over a Space, one Frontier pop at a
/// time.
///
/// Discovered states are marked on the Space itself along with the state they
/// were discovered from, so each state goes through the Frontier at most once.
///
/// This is an Iterator of `TraversalEvent`s. It's lazy, finite and can't be
/// restarted: once it reports `Found` or `Exhausted` it only returns `None`.
#[derive(Debug)]
pub struct TraversalSearch<'s, F, Sp, St, A>
where
    F: Frontier<St>,
    Sp: Space<St, A> + SearchMarks<St>,
    St: State,
    A: Action,
{
    space: &'s mut Sp,
    /// Discovered states waiting to be expanded.
    ///
    /// Every state in here is already marked as visited.
    frontier: F,

    start: St,
    goal: St,

    expanded: usize,
    peak_frontier: usize,
    finished: bool,

    _phantom_action: PhantomData<A>,
}

/// Traversal with a FIFO Frontier.
///
/// States come out in non-decreasing distance from start, so the path found
/// is a shortest one.
pub type BreadthFirstSearch<'s, Sp, St, A> = TraversalSearch<'s, Queue<St>, Sp, St, A>;

/// Traversal with a LIFO Frontier.
///
/// Paths found carry no optimality guarantee.
pub type DepthFirstSearch<'s, Sp, St, A> = TraversalSearch<'s, Stack<St>, Sp, St, A>;

impl<'s, F, Sp, St, A> TraversalSearch<'s, F, Sp, St, A>
where
    F: Frontier<St>,
    Sp: Space<St, A> + SearchMarks<St>,
    St: State,
    A: Action,
{
    /// Initialises the Search
    ///
    /// Wipes whatever marks previous traversals left on the Space.
    #[must_use]
    pub fn new(space: &'s mut Sp, start: St, goal: St) -> Self {
        space.clear_marks();

        let mut frontier = F::default();
        space.mark_visited(&start, None);
        frontier.push(start);

        Self {
            space,
            peak_frontier: frontier.len(),
            frontier,
            start,
            goal,
            expanded: 0,
            finished: false,
            _phantom_action: PhantomData,
        }
    }

    /// Runs the traversal until it produces its next event.
    ///
    /// Popping start doesn't produce an event by itself, so it's expanded
    /// silently and the next pop is taken.
    #[must_use]
    pub fn step(&mut self) -> Option<TraversalEvent<St, A>> {
        if self.finished {
            return None;
        }

        while let Some(state) = self.frontier.pop() {
            self.expanded += 1;
            log::trace!("Expanding {state:?} (frontier: {})", self.frontier.len());

            if state == self.goal {
                self.finished = true;
                let path = reconstruct_path(&*self.space, self.start, self.goal);
                debug_assert!(path.start() == Some(self.start));
                return Some(TraversalEvent::Found(path));
            }

            self.expand(&state);
            self.verify_marks();

            if state != self.start {
                return Some(TraversalEvent::Visited(state));
            }
        }

        self.finished = true;
        Some(TraversalEvent::Exhausted)
    }

    /// Discovers the unvisited neighbours of a state, in the order the Space
    /// lists them.
    #[inline(always)]
    fn expand(&mut self, state: &St) {
        for (s, _a) in self.space.neighbours(state) {
            if self.space.is_visited(&s) {
                continue;
            }
            self.space.mark_visited(&s, Some(*state));
            self.frontier.push(s);
        }
        self.peak_frontier = max(self.peak_frontier, self.frontier.len());
    }

    /// Runs the traversal to completion, calling `on_visit` for every
    /// `Visited` event.
    pub fn run<V>(mut self, mut on_visit: V) -> TraversalOutcome<St, A>
    where
        V: FnMut(&St),
    {
        let mut path = None;
        for event in self.by_ref() {
            match event {
                TraversalEvent::Visited(s) => on_visit(&s),
                TraversalEvent::Found(p) => path = Some(p),
                TraversalEvent::Exhausted => {}
            }
        }

        TraversalOutcome {
            path,
            expanded: self.expanded,
            peak_frontier: self.peak_frontier,
        }
    }

    /// States taken out of the Frontier so far, start and goal included.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
    /// Largest size the Frontier reached so far.
    pub fn peak_frontier(&self) -> usize {
        self.peak_frontier
    }
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify_marks(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify_marks(&self) {
        let size = self.space.size();
        assert!(
            self.expanded <= size,
            "Expanded {} states out of {size}",
            self.expanded
        );
        assert!(
            self.expanded + self.frontier.len() <= size,
            "Frontier holds states already expanded"
        );
        assert!(self.space.is_visited(&self.start));
    }
}

impl<F, Sp, St, A> Iterator for TraversalSearch<'_, F, Sp, St, A>
where
    F: Frontier<St>,
    Sp: Space<St, A> + SearchMarks<St>,
    St: State,
    A: Action,
{
    type Item = TraversalEvent<St, A>;
    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}
