//! Startup seeding of sample records

use crate::config::PeopleConfig;
use crate::person::Person;
use crate::repository::{PersonStore, RepositoryResult};

/// The records saved into an empty store at startup
pub fn sample_people() -> [Person; 2] {
    [
        Person::new("chrisnolan123", "nolan@email.com", "chris", "nolan"),
        Person::new("martinscorc123", "martin@email.com", "martin", "scorcese"),
    ]
}

/// Seed the store unless preloading is off or the store already has data
///
/// Returns how many records were saved.
pub async fn preload<S: PersonStore>(store: &S, config: &PeopleConfig) -> RepositoryResult<usize> {
    if !config.preload {
        tracing::debug!("Preload disabled");
        return Ok(0);
    }

    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Store not empty, skipping preload");
        return Ok(0);
    }

    let mut saved = 0;
    for person in sample_people() {
        let person = store.save(person).await?;
        tracing::info!("Preloading {}", person);
        saved += 1;
    }
    Ok(saved)
}
