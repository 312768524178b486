use {crate::body::BodiesChanged, std::ops::Deref};

/// Events published by the external tracking source for one tick.
pub type TrackingEvents = EventBroker<BodiesChanged>;

/// Distributes events of type `T` among readers.
///
/// Events stay in the pool until `clear` (once per tick) so that several
/// readers can observe the same tick; a reader that wants exclusive
/// ownership takes the event with [`Ref::consume`].
pub struct EventBroker<T> {
    pool: Vec<Option<T>>,
}

impl<T> EventBroker<T> {
    pub fn new() -> Self {
        EventBroker { pool: Vec::new() }
    }

    pub fn add(&mut self, event: T) {
        self.pool.push(Some(event));
    }

    pub fn read(&mut self) -> Iter<'_, T> {
        Iter {
            entries: self.pool.iter_mut(),
        }
    }

    pub fn clear(&mut self) {
        self.pool.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pool.iter().all(|entry| entry.is_none())
    }
}

impl<T> Default for EventBroker<T> {
    fn default() -> Self {
        EventBroker::new()
    }
}

pub struct Ref<'a, T> {
    entry: &'a mut Option<T>,
}

impl<T> Deref for Ref<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.entry.as_ref().unwrap()
    }
}

impl<T> Ref<'_, T> {
    /// Takes the event out of the pool; later readers will not see it.
    pub fn consume(self) -> T {
        self.entry.take().unwrap()
    }
}

pub struct Iter<'a, T> {
    entries: std::slice::IterMut<'a, Option<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = Ref<'a, T>;

    fn next(&mut self) -> Option<Ref<'a, T>> {
        loop {
            let entry = self.entries.next()?;
            if entry.is_some() {
                return Some(Ref { entry });
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_survive_until_cleared() {
        let mut broker = EventBroker::new();
        broker.add(1u32);
        broker.add(2);

        assert_eq!(broker.read().map(|e| *e).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(broker.read().count(), 2);

        broker.clear();
        assert!(broker.is_empty());
        assert_eq!(broker.read().count(), 0);
    }

    #[test]
    fn consumed_events_disappear() {
        let mut broker = EventBroker::new();
        broker.add(7u32);

        let event = broker.read().next().unwrap().consume();
        assert_eq!(event, 7);
        assert!(broker.is_empty());
    }
}
