//! Application state shared with every axum handler

use std::sync::Arc;

use crate::config::Config;
use crate::handlers::{PersonHandler, PersonModelAssembler};
use crate::repository::PersonStore;

/// Configuration plus the person handler, generic over the store backend
pub struct AppState<S> {
    config: Arc<Config>,
    people: Arc<PersonHandler<S>>,
}

// Manual impl: a derive would require `S: Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            people: Arc::clone(&self.people),
        }
    }
}

impl<S: PersonStore> AppState<S> {
    /// Build the handler from `config` over `store`
    pub fn new(config: Config, store: Arc<S>) -> Self {
        let assembler = PersonModelAssembler::new(config.service.public_url.as_deref());
        let people = PersonHandler::new(store, assembler, config.people.on_missing_field_update);

        Self {
            config: Arc::new(config),
            people: Arc::new(people),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn people(&self) -> &PersonHandler<S> {
        &self.people
    }

    pub fn store(&self) -> &Arc<S> {
        self.people.store()
    }
}
