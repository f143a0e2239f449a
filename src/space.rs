use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

const MAX_ELEMENTS_DISPLAYED: usize = 20;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Successors of a state, in the order the Space enumerates them.
///
/// Grid-like spaces have at most 4 of them, so they stay on the stack.
pub type Neighbours<St, A> = SmallVec<[(St, A); 4]>;

/// A walk through a Space.
///
/// Keeps every state it goes over, `states[0]` being the start and the last
/// one the end, and the actions taking each state to the next one, so
/// `actions.len() + 1 == states.len()` for non-empty paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A>
where
    St: State,
    A: Action,
{
    pub states: Vec<St>,
    pub actions: Vec<A>,
}

impl<St, A> Path<St, A>
where
    St: State,
    A: Action,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
        }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            states: vec![],
            actions: vec![],
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of states in the Path, both ends included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> Option<St> {
        self.states.first().copied()
    }
    pub fn end(&self) -> Option<St> {
        self.states.last().copied()
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        if self.states.is_empty() {
            return self.actions.is_empty();
        }
        self.actions.len() + 1 == self.states.len()
    }

    #[inline(always)]
    pub fn append(&mut self, last_action: (St, A)) {
        let (s, a) = last_action;
        self.actions.push(a);
        self.states.push(s);
    }

    /// Reverses the Path, likely making it invalid.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        self.states.reverse();
        self.actions.reverse();
    }
}

impl<St, A> std::fmt::Display for Path<St, A>
where
    St: State + std::fmt::Display,
    A: Action + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(f, "Path({}, {start}:", self.len())?;
                for a in self.actions.iter().take(MAX_ELEMENTS_DISPLAYED) {
                    write!(f, "{a}")?;
                }
                if self.actions.len() > MAX_ELEMENTS_DISPLAYED {
                    write!(f, "…")?;
                }
                write!(f, ":{end})")
            }
            _ => write!(f, "Path()"),
        }
    }
}

pub trait Space<St, A>: Debug
where
    St: State,
    A: Action,
{
    /// Applies an action, returning the State it leads to if it's part of
    /// the Space and can be stood on.
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// Expands a State
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;

    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Number of States in the Space.
    fn size(&self) -> usize;

    /// Checks that a Path can be walked and never comes back to a State.
    fn valid_path(&self, p: &Path<St, A>) -> bool {
        if p.is_empty() {
            // Empty paths are fine
            return p.actions.is_empty();
        }
        if !p.seems_valid() || !self.valid(&p.states[0]) {
            return false;
        }

        let mut seen = FxHashSet::<St>::default();
        seen.insert(p.states[0]);
        for (i, a) in p.actions.iter().enumerate() {
            match self.apply(&p.states[i], a) {
                Some(s) if s == p.states[i + 1] => {
                    if !seen.insert(s) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}
