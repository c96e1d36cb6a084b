//! Diagnostics with coloured terminal output.
//!
//! Provides deduplication to avoid spamming the same warning every frame.
//! Used for lookup misses: unknown attribute values, duplicate identifiers,
//! unregistered callbacks, unresolved strings and missing images.

use std::collections::HashSet;
use std::sync::Mutex;

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("markup", "unknown length 'wide' on <space>, using auto");
/// ```
///
/// A poisoned lock still records the warning; diagnostics never panic.
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = {
        let mut guard = WARNED
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.get_or_insert_with(HashSet::new).insert(key)
    };

    if should_print {
        eprintln!(
            "{}",
            format!("[botblocks {component}] ⚠ {message}").yellow()
        );
    }
}

/// Whether a given warning has already been emitted since the last clear.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call when loading a new page or level)
pub fn clear_warnings() {
    let mut guard = WARNED
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_recorded() {
        warn_once("test", "recorded-once");
        assert!(was_warned("test", "recorded-once"));
        assert!(!was_warned("test", "never-emitted"));
    }
}
