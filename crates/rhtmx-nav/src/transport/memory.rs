//! In-memory history stack

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{Location, LocationCallback, NavigationTransport, Subscription};
use crate::Result;

type Listener = Rc<dyn Fn(&Location)>;

struct HistoryState {
    entries: Vec<String>,
    index: usize,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

/// A browser-like history stack kept in memory
///
/// `push_location` and `replace_location` behave like `pushState` and
/// `replaceState`: they do not notify listeners. `back` and `forward` do,
/// the way `popstate` fires for the browser's buttons.
///
/// Clones share the same stack.
///
/// # Examples
///
/// ```
/// use rhtmx_nav::{MemoryHistory, NavigationTransport};
///
/// let history = MemoryHistory::new("/");
/// history.push_location("/users/7");
/// history.push_location("/users/8");
///
/// assert!(history.back());
/// assert_eq!(history.current(), "/users/7");
/// assert_eq!(history.entries(), vec!["/", "/users/7", "/users/8"]);
/// ```
#[derive(Clone)]
pub struct MemoryHistory {
    state: Rc<RefCell<HistoryState>>,
}

impl MemoryHistory {
    /// Creates a stack holding a single initial entry
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HistoryState {
                entries: vec![initial.into()],
                index: 0,
                listeners: Vec::new(),
                next_listener_id: 0,
            })),
        }
    }

    /// The current entry as written by the router
    pub fn current(&self) -> String {
        let state = self.state.borrow();
        state.entries[state.index].clone()
    }

    /// Every entry, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// Moves one entry back and notifies listeners; `false` at the oldest entry
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Moves one entry forward and notifies listeners; `false` at the newest entry
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Moves `delta` entries and notifies listeners; `false` if out of range
    pub fn go(&self, delta: isize) -> bool {
        {
            let mut state = self.state.borrow_mut();
            let target = state.index as isize + delta;
            if delta == 0 || target < 0 || target >= state.entries.len() as isize {
                return false;
            }
            state.index = target as usize;
        }
        self.notify();
        true
    }

    fn notify(&self) {
        // Listeners may push or read; release the borrow before calling them.
        let (current, listeners) = {
            let state = self.state.borrow();
            let listeners: Vec<Listener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (state.entries[state.index].clone(), listeners)
        };

        match Location::parse(&current) {
            Ok(location) => listeners.iter().for_each(|listener| listener(&location)),
            Err(err) => tracing::warn!(%err, "history entry is not a valid location"),
        }
    }
}

impl NavigationTransport for MemoryHistory {
    fn read_current_location(&self) -> Result<Location> {
        Location::parse(&self.current())
    }

    fn push_location(&self, path_and_query: &str) {
        let mut state = self.state.borrow_mut();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(path_and_query.to_string());
        state.index = keep;
    }

    fn replace_location(&self, path_and_query: &str) {
        let mut state = self.state.borrow_mut();
        let index = state.index;
        state.entries[index] = path_and_query.to_string();
    }

    fn on_location_change(&self, callback: LocationCallback) -> Option<Subscription> {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push((id, Rc::from(callback)));
            id
        };

        let weak: Weak<RefCell<HistoryState>> = Rc::downgrade(&self.state);
        Some(Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state
                    .borrow_mut()
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        }))
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &state.entries)
            .field("index", &state.index)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
