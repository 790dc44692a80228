//! Synchronous observer lists standing in for the host toolkit's signal/slot
//! change notification.
//!
//! Delivery happens on the caller's stack, in registration order. State a
//! callback needs to touch lives behind `Rc`/`Cell` captures on the caller's
//! side; callbacks must not mutate the emitting object (the editor's
//! reentrancy guards exist for the coupled-view paths, not for observers).

/// An ordered list of callbacks for one notification channel.
pub struct Subscribers<T> {
    callbacks: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self { callbacks: Vec::new() }
    }
}

impl<T> Subscribers<T> {
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    pub fn emit(&mut self, value: &T) {
        for callback in &mut self.callbacks {
            callback(value);
        }
    }
}

impl<T> std::fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivery_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::<i32>::default();
        for tag in ["a", "b", "c"] {
            let seen = seen.clone();
            subs.subscribe(move |v| seen.borrow_mut().push(format!("{tag}{v}")));
        }
        subs.emit(&1);
        subs.emit(&2);
        assert_eq!(*seen.borrow(), ["a1", "b1", "c1", "a2", "b2", "c2"]);
    }

    #[test]
    fn empty_list_emits_nothing() {
        let mut subs = Subscribers::<()>::default();
        subs.emit(&());
    }
}
