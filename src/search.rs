//! Bookkeeping a traversal leaves behind, and how to read a Path back from it.

use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Per-state marks written by a running traversal.
///
/// Parents are States rather than references, so the search tree lives inside
/// whatever stores the marks and resolving a parent is a lookup.
pub trait SearchMarks<St>
where
    St: State,
{
    fn is_visited(&self, s: &St) -> bool;
    /// Marks a State as discovered, reached from `parent` (`None` for roots).
    fn mark_visited(&mut self, s: &St, parent: Option<St>);
    fn parent(&self, s: &St) -> Option<St>;
    /// Forgets every mark, leaving the Space ready for a new traversal.
    fn clear_marks(&mut self);
}

/// Walks the parent marks back from `end` to `start`.
///
/// Returns an empty Path when `end` was never reached or its parent chain does
/// not lead back to `start`.
#[must_use]
pub fn reconstruct_path<Sp, St, A>(space: &Sp, start: St, end: St) -> Path<St, A>
where
    Sp: Space<St, A> + SearchMarks<St>,
    St: State,
    A: Action,
{
    if !space.is_visited(&end) {
        return Path::empty();
    }

    let mut s = end;
    let mut path = Path::<St, A>::new_from_start(s);
    // A chain longer than the Space has a cycle in it.
    let max_steps = space.size();

    while let Some(parent_state) = space.parent(&s) {
        if path.len() > max_steps {
            log::warn!("Parent chain from {end:?} loops, giving up");
            return Path::empty();
        }
        let Some(a) = space
            .neighbours(&parent_state)
            .into_iter()
            .find_map(|(sib, sib_a)| (sib == s).then_some(sib_a))
        else {
            return Path::empty();
        };

        path.append((parent_state, a));
        debug_assert!(s != parent_state);
        s = parent_state;
    }

    if s != start {
        return Path::empty();
    }

    path.reverse();
    path
}
