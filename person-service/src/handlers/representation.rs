//! Hypermedia representations
//!
//! Responses follow HAL: an entity's own fields plus a `_links` object, and
//! collections wrap their members under `_embedded`.
//!
//! ```json
//! {
//!   "id": 1,
//!   "username": "chrisnolan123",
//!   "email": "nolan@email.com",
//!   "firstname": "chris",
//!   "lastname": "nolan",
//!   "_links": {
//!     "self":   { "href": "/person/1" },
//!     "people": { "href": "/people" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::person::Person;

/// Relation name of a resource's own link
pub const SELF_REL: &str = "self";

/// Relation name of the person collection
pub const PEOPLE_REL: &str = "people";

/// Key persons are embedded under in a collection
pub const PERSON_LIST_REL: &str = "personList";

/// A navigational link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

/// Relation name -> link
pub type Links = BTreeMap<String, Link>;

/// A single entity enriched with links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T) -> Self {
        Self {
            content,
            links: Links::new(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.links.insert(rel.into(), link);
        self
    }

    /// The `self` link, if present
    pub fn self_link(&self) -> Option<&Link> {
        self.links.get(SELF_REL)
    }
}

impl<T: Serialize> IntoResponse for EntityModel<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A collection of entity models with collection-level links
///
/// `_embedded` is omitted entirely when the collection is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionModel<T> {
    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub embedded: BTreeMap<String, Vec<EntityModel<T>>>,
    #[serde(rename = "_links", default)]
    pub links: Links,
}

impl<T> CollectionModel<T> {
    /// Embed `items` under `rel`; an empty list embeds nothing
    pub fn new(rel: impl Into<String>, items: Vec<EntityModel<T>>) -> Self {
        let mut embedded = BTreeMap::new();
        if !items.is_empty() {
            embedded.insert(rel.into(), items);
        }
        Self {
            embedded,
            links: Links::new(),
        }
    }

    #[must_use]
    pub fn with_link(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.links.insert(rel.into(), link);
        self
    }

    /// Every embedded model, across relations
    pub fn items(&self) -> impl Iterator<Item = &EntityModel<T>> {
        self.embedded.values().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.embedded.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Serialize> IntoResponse for CollectionModel<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Turns persisted persons into linked representations
///
/// Hrefs are `base_url` followed by the resource path. An empty base yields
/// root-relative hrefs.
#[derive(Debug, Clone, Default)]
pub struct PersonModelAssembler {
    base_url: String,
}

impl PersonModelAssembler {
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Link to the single-resource endpoint for `person`
    ///
    /// A person without an id gets a link to the bare `/person/` path.
    pub fn person_link(&self, person: &Person) -> Link {
        let id = person.id.map(|id| id.to_string()).unwrap_or_default();
        Link::new(format!("{}/person/{}", self.base_url, id))
    }

    /// Link to the collection endpoint
    pub fn people_link(&self) -> Link {
        Link::new(format!("{}/people", self.base_url))
    }

    pub fn to_model(&self, person: Person) -> EntityModel<Person> {
        let self_link = self.person_link(&person);
        EntityModel::new(person)
            .with_link(SELF_REL, self_link)
            .with_link(PEOPLE_REL, self.people_link())
    }

    pub fn to_collection(&self, people: Vec<Person>) -> CollectionModel<Person> {
        let models = people.into_iter().map(|p| self.to_model(p)).collect();
        CollectionModel::new(PERSON_LIST_REL, models).with_link(SELF_REL, self.people_link())
    }
}
