use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Consumer<T> = Box<dyn FnMut(&T)>;

struct Registry<T> {
    next_id: u64,
    consumers: Vec<(u64, Consumer<T>)>,
    // Ids dropped while an emit has the consumer list checked out.
    removed: Vec<u64>,
    emitting: bool,
}

impl<T> Registry<T> {
    fn remove(&mut self, id: u64) {
        if self.emitting {
            self.removed.push(id);
        }
        self.consumers.retain(|(consumer_id, _)| *consumer_id != id);
    }
}

/// Single-threaded callback registry. Consumers run in registration order;
/// consumers added or removed during an emit take effect on the next emit.
pub struct EventSource<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> EventSource<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                consumers: Vec::new(),
                removed: Vec::new(),
                emitting: false,
            })),
        }
    }

    pub fn subscribe(&self, consumer: impl FnMut(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.consumers.push((id, Box::new(consumer)));
            id
        };

        let registry: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            id,
            detach: Some(Box::new(move |id| {
                if let Some(registry) = registry.upgrade() {
                    registry.borrow_mut().remove(id);
                }
            })),
        }
    }

    pub fn emit(&self, event: &T) {
        let mut consumers = {
            let mut registry = self.registry.borrow_mut();
            if registry.emitting {
                log::warn!("nested emit ignored");
                return;
            }
            registry.emitting = true;
            std::mem::take(&mut registry.consumers)
        };

        for (id, consumer) in consumers.iter_mut() {
            let removed = self.registry.borrow().removed.contains(id);
            if !removed {
                consumer(event);
            }
        }

        let mut registry = self.registry.borrow_mut();
        let removed = std::mem::take(&mut registry.removed);
        consumers.retain(|(id, _)| !removed.contains(id));
        consumers.append(&mut registry.consumers);
        registry.consumers = consumers;
        registry.emitting = false;
    }

    pub fn consumer_count(&self) -> usize {
        self.registry.borrow().consumers.len()
    }
}

impl<T: 'static> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered consumer. Dropping it unregisters the consumer.
pub struct Subscription {
    id: u64,
    detach: Option<Box<dyn FnOnce(u64)>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn consumers_run_in_registration_order() {
        let source = EventSource::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = {
            let seen = Rc::clone(&seen);
            source.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = Rc::clone(&seen);
            source.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
        };

        source.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        drop((a, b));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let source = EventSource::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = Rc::clone(&hits);
            source.subscribe(move |_| hits.set(hits.get() + 1))
        };

        source.emit(&1);
        sub.unsubscribe();
        source.emit(&2);

        assert_eq!(hits.get(), 1);
        assert_eq!(source.consumer_count(), 0);
    }

    #[test]
    fn dropping_subscription_unregisters() {
        let source = EventSource::<()>::new();
        {
            let _sub = source.subscribe(|_| {});
            assert_eq!(source.consumer_count(), 1);
        }
        assert_eq!(source.consumer_count(), 0);
    }

    #[test]
    fn subscription_outliving_source_is_harmless() {
        let sub = {
            let source = EventSource::<()>::new();
            source.subscribe(|_| {})
        };
        assert!(sub.is_active());
        sub.unsubscribe();
    }

    #[test]
    fn consumer_removed_during_emit_is_skipped() {
        let source = Rc::new(EventSource::<()>::new());
        let later_hits = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _killer = {
            let victim = Rc::clone(&victim);
            source.subscribe(move |_| {
                victim.borrow_mut().take();
            })
        };
        let sub = {
            let later_hits = Rc::clone(&later_hits);
            source.subscribe(move |_| later_hits.set(later_hits.get() + 1))
        };
        *victim.borrow_mut() = Some(sub);

        source.emit(&());
        source.emit(&());

        assert_eq!(later_hits.get(), 0);
        assert_eq!(source.consumer_count(), 1);
    }

    #[test]
    fn consumer_added_during_emit_runs_next_time() {
        let source = Rc::new(EventSource::<()>::new());
        let hits = Rc::new(Cell::new(0));
        let added: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let _adder = {
            let source_ref = Rc::downgrade(&source);
            let hits = Rc::clone(&hits);
            let added = Rc::clone(&added);
            source.subscribe(move |_| {
                if let Some(source) = source_ref.upgrade() {
                    if added.borrow().is_empty() {
                        let hits = Rc::clone(&hits);
                        let sub = source.subscribe(move |_| hits.set(hits.get() + 1));
                        added.borrow_mut().push(sub);
                    }
                }
            })
        };

        source.emit(&());
        assert_eq!(hits.get(), 0);
        source.emit(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(source.consumer_count(), 2);
    }
}
