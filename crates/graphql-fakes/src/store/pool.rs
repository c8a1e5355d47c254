/// Round-robin allocator over the ids of one type, or the `(type, id)` keys of an abstract type.
///
/// Ids are handed out from the end of the pool. Once the pool runs dry it is refilled with the
/// full enumeration, so every id is used once before any id is used twice.
#[derive(Debug, Clone)]
pub struct IdPool<T = String> {
    all: Vec<T>,
    remaining: Vec<T>,
}

impl<T: Clone> IdPool<T> {
    pub fn new(all: Vec<T>) -> Self {
        IdPool {
            remaining: all.clone(),
            all,
        }
    }

    /// Takes the last `count` ids of the pool, keeping their pool order.
    ///
    /// Fewer ids are returned when the pool holds less than `count` of them: a take never spans a
    /// refill.
    pub fn take(&mut self, count: usize) -> Vec<T> {
        let split_at = self.remaining.len().saturating_sub(count);
        let taken = self.remaining.split_off(split_at);

        if self.remaining.is_empty() {
            tracing::debug!("refilling id pool with {} ids", self.all.len());
            self.remaining.clone_from(&self.all);
        }

        taken
    }

    pub fn take_one(&mut self) -> Option<T> {
        self.take(1).pop()
    }

    pub fn remaining(&self) -> &[T] {
        &self.remaining
    }
}
