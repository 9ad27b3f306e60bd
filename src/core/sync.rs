//! Lock helper that turns poisoned guards into module errors
//!
//! The in-memory queue and the recording sink share state behind std locks.
//! A panic while one of those locks is held poisons it; rather than
//! propagating the panic into every later caller, `lock_or` maps the
//! poison into whatever error type the calling module reports.

use std::sync::{LockResult, MutexGuard};

fn poison_message(kind: &str) -> String {
    format!(
        "Internal synchronisation error ({} poisoned); a task panicked while holding the lock",
        kind
    )
}

/// Map a poisoned `Mutex::lock()` result into an application error
///
/// # Examples
/// ```
/// use std::sync::Mutex;
/// use lightsync::core::sync::lock_or;
///
/// let entries = Mutex::new(vec![1, 2, 3]);
/// let guard = lock_or(entries.lock(), |msg| msg).unwrap();
/// assert_eq!(guard.len(), 3);
/// ```
pub fn lock_or<'a, T, E>(
    result: LockResult<MutexGuard<'a, T>>,
    error_constructor: impl FnOnce(String) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    result.map_err(|_| error_constructor(poison_message("mutex")))
}
