//! Named click callbacks.
//!
//! Markup binds an element to a callback by name (`onclick="start"`); the
//! host registers the behaviour under that name once, after the session is
//! built. A callback receives the session and the clicked element, and may
//! rewrite the page, switch pages, or edit and run the program.

use std::collections::{HashMap, HashSet};
use std::fmt;

use botblocks_dom::NodeId;

use crate::session::Session;

/// A click handler.
pub type Callback = Box<dyn FnMut(&mut Session, NodeId)>;

/// Name → callback table.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Callback>,
    /// Names whose callback is currently running.
    running: HashSet<String>,
    /// Running names that were unregistered before they returned.
    dropped: HashSet<String>,
}

impl CallbackRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `callback` to `name`, replacing any previous binding.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&mut Session, NodeId) + 'static,
    ) {
        let name = name.into();
        let _ = self.dropped.remove(&name);
        let _ = self.callbacks.insert(name, Box::new(callback));
    }

    /// Remove the binding for `name`.
    ///
    /// A callback may unregister its own name; it is not restored when it
    /// returns.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.callbacks.remove(name).is_some();
        if self.running.contains(name) {
            return self.dropped.insert(name.to_string()) || removed;
        }
        removed
    }

    /// Whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
            || (self.running.contains(name) && !self.dropped.contains(name))
    }

    /// Bound names, in no particular order. A callback that is running is
    /// not listed.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.callbacks.keys().map(String::as_str)
    }

    /// Borrow a callback out of the table for the duration of a call.
    pub(crate) fn take(&mut self, name: &str) -> Option<Callback> {
        let callback = self.callbacks.remove(name)?;
        let _ = self.running.insert(name.to_string());
        Some(callback)
    }

    /// Put a taken callback back, unless it was rebound or unregistered
    /// while running.
    pub(crate) fn restore(&mut self, name: &str, callback: Callback) {
        let _ = self.running.remove(name);
        if self.dropped.remove(name) {
            return;
        }
        let _ = self.callbacks.entry(name.to_string()).or_insert(callback);
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.callbacks.keys()).finish()
    }
}
