//! Synchronous broadcast primitive used by the state managers.
//!
//! Subscribers are invoked in registration order with a snapshot reference;
//! delivery is synchronous, never deferred to a microtask. `subscribe`
//! returns an explicit handle so callers control unsubscription.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Entry<T> = (u64, Rc<dyn Fn(&T)>);
type EntryList<T> = Rc<RefCell<Vec<Entry<T>>>>;

pub struct Subscribers<T> {
    entries: EntryList<T>,
    next_id: u64,
}

pub struct Subscription<T> {
    id: u64,
    entries: Weak<RefCell<Vec<Entry<T>>>>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, callback: impl Fn(&T) + 'static) -> Subscription<T> {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        Subscription {
            id,
            entries: Rc::downgrade(&self.entries),
        }
    }

    /// Invoke every subscriber with `value`. The list is snapshotted first,
    /// so a callback may subscribe or unsubscribe without affecting this
    /// delivery round.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Rc<dyn Fn(&T)>> =
            self.entries.borrow().iter().map(|(_, cb)| cb.clone()).collect();
        for cb in snapshot {
            cb(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn notifies_all_subscribers_in_order() {
        let mut subs: Subscribers<u32> = Subscribers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b"] {
            let log = log.clone();
            subs.subscribe(move |v: &u32| log.borrow_mut().push(format!("{tag}{v}")));
        }
        subs.notify(&7);
        assert_eq!(*log.borrow(), vec!["a7".to_string(), "b7".to_string()]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut subs: Subscribers<u32> = Subscribers::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = subs.subscribe(move |_| c.set(c.get() + 1));
        subs.notify(&1);
        handle.unsubscribe();
        subs.notify(&2);
        assert_eq!(count.get(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn unsubscribe_during_notify_does_not_disrupt_round() {
        let mut subs: Subscribers<u32> = Subscribers::new();
        let count = Rc::new(Cell::new(0));
        let handle = Rc::new(RefCell::new(None));
        {
            let handle = handle.clone();
            let c = count.clone();
            subs.subscribe(move |_| {
                c.set(c.get() + 1);
                if let Some(h) = handle.borrow_mut().take() {
                    let h: Subscription<u32> = h;
                    h.unsubscribe();
                }
            });
        }
        let c = count.clone();
        let second = subs.subscribe(move |_| c.set(c.get() + 10));
        *handle.borrow_mut() = Some(second);

        // First round: both fire even though the first callback removed the
        // second mid-delivery.
        subs.notify(&0);
        assert_eq!(count.get(), 11);

        subs.notify(&0);
        assert_eq!(count.get(), 12);
    }
}
