use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    config::FakesConfig,
    population::Population,
    store::{Assignments, ObjectStore},
};

/// Everything the resolvers share during a server session.
///
/// The store is read-only once loaded. Pools and memo tables are mutated while resolving, behind a
/// single lock so that a pop, a refill and the memo write that follows happen as one step.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    store: ObjectStore,
    assignments: Mutex<Assignments>,
    config: FakesConfig,
}

impl ResolutionContext {
    pub fn new(store: ObjectStore, config: FakesConfig) -> Self {
        ResolutionContext {
            store,
            assignments: Mutex::default(),
            config,
        }
    }

    pub fn from_population(population: Population, config: FakesConfig) -> Self {
        tracing::info!(
            "loaded mock data for {} types and partials for {} types",
            population.new_database.len(),
            population.new_partials_database.len()
        );

        Self::new(
            ObjectStore::new(population.new_database, population.new_partials_database),
            config,
        )
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn config(&self) -> &FakesConfig {
        &self.config
    }

    pub(crate) fn assignments(&self) -> MutexGuard<'_, Assignments> {
        // The memo tables stay consistent even if a resolver panicked while holding the lock.
        self.assignments.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forgets every filler assignment and refills every pool.
    pub fn reset(&self) {
        self.assignments().clear();
    }
}
