//! Scoped reentrancy guard for propagating updates between the coupled
//! Euler and quaternion views.
//!
//! One `UpdateFlag` is shared by everything that participates in a
//! propagating update; raising it returns an RAII token so the flag is
//! restored on every exit path, early returns included.

use std::cell::Cell;
use std::rc::Rc;

/// Shared "update in progress" flag. Cloning yields a handle to the same flag.
#[derive(Clone, Default)]
pub struct UpdateFlag(Rc<Cell<bool>>);

impl UpdateFlag {
    pub fn is_raised(&self) -> bool {
        self.0.get()
    }

    /// Raise the flag for the lifetime of the returned token. Nested raises
    /// are fine; each token restores the state it observed.
    #[must_use]
    pub fn raise(&self) -> UpdateToken {
        let was_raised = self.0.replace(true);
        UpdateToken { flag: Rc::clone(&self.0), was_raised }
    }
}

impl std::fmt::Debug for UpdateFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("UpdateFlag").field(&self.0.get()).finish()
    }
}

pub struct UpdateToken {
    flag: Rc<Cell<bool>>,
    was_raised: bool,
}

impl Drop for UpdateToken {
    fn drop(&mut self) {
        self.flag.set(self.was_raised);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raised_only_while_token_lives() {
        let flag = UpdateFlag::default();
        assert!(!flag.is_raised());
        {
            let _token = flag.raise();
            assert!(flag.is_raised());
        }
        assert!(!flag.is_raised());
    }

    #[test]
    fn nested_raises_restore_outer_state() {
        let flag = UpdateFlag::default();
        let outer = flag.raise();
        {
            let _inner = flag.raise();
            assert!(flag.is_raised());
        }
        // Inner token dropped; outer raise still in effect.
        assert!(flag.is_raised());
        drop(outer);
        assert!(!flag.is_raised());
    }

    #[test]
    fn clones_share_the_flag() {
        let flag = UpdateFlag::default();
        let handle = flag.clone();
        let _token = flag.raise();
        assert!(handle.is_raised());
    }
}
