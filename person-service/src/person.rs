//! The Person entity and its field-level validation
//!
//! A [`Person`] is both the persisted record and the JSON payload accepted by
//! the write endpoints. Every attribute is nullable on the wire; the store
//! assigns [`PersonId`]s on first save.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message reported when `username` is blank
pub const USERNAME_MANDATORY: &str = "username is mandatory";

/// Message reported when `email` is blank
pub const EMAIL_MANDATORY: &str = "email is mandatory";

/// Field name -> message, one message per field
///
/// Inserting a second message for the same field replaces the first.
pub type FieldErrors = BTreeMap<String, String>;

/// Store-assigned identifier of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl PersonId {
    /// Returns the raw integer value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PersonId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for PersonId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A person record
///
/// `username` and `email` must be non-blank before the record is persisted;
/// see [`Person::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: Option<PersonId>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl Person {
    /// Create a transient person without an id
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: Some(username.into()),
            email: Some(email.into()),
            firstname: Some(firstname.into()),
            lastname: Some(lastname.into()),
        }
    }

    /// Set the id, consuming and returning the person
    #[must_use]
    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check the presence rules on `username` and `email`
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if is_blank(self.username.as_deref()) {
            errors.insert(
                PersonField::Username.as_str().to_string(),
                USERNAME_MANDATORY.to_string(),
            );
        }
        if is_blank(self.email.as_deref()) {
            errors.insert(
                PersonField::Email.as_str().to_string(),
                EMAIL_MANDATORY.to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Overwrite all mutable attributes with those of `other`
    ///
    /// The id is left untouched.
    pub fn replace_attributes(&mut self, other: Person) {
        self.username = other.username;
        self.email = other.email;
        self.firstname = other.firstname;
        self.lastname = other.lastname;
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "null".to_string());
        write!(
            f,
            "Person{{id={}, username='{}', email='{}', firstname='{}', lastname='{}'}}",
            id,
            self.username.as_deref().unwrap_or("null"),
            self.email.as_deref().unwrap_or("null"),
            self.firstname.as_deref().unwrap_or("null"),
            self.lastname.as_deref().unwrap_or("null"),
        )
    }
}

/// A single mutable attribute of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonField {
    Username,
    Email,
    Firstname,
    Lastname,
}

impl PersonField {
    /// JSON / path name of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
        }
    }

    /// Copy this field's value from `source` onto `target`
    ///
    /// A null value in `source` clears the field on `target`.
    pub fn copy(self, source: &Person, target: &mut Person) {
        match self {
            Self::Username => target.username = source.username.clone(),
            Self::Email => target.email = source.email.clone(),
            Self::Firstname => target.firstname = source.firstname.clone(),
            Self::Lastname => target.lastname = source.lastname.clone(),
        }
    }
}

impl fmt::Display for PersonField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nolan() -> Person {
        Person::new("chrisnolan123", "nolan@email.com", "chris", "nolan")
    }

    #[test]
    fn test_valid_person() {
        assert!(nolan().validate().is_ok());
    }

    #[test]
    fn test_blank_username() {
        let mut person = nolan();
        person.username = Some("   ".to_string());

        let errors = person.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("username").unwrap(), USERNAME_MANDATORY);
    }

    #[test]
    fn test_missing_username_and_email() {
        let person = Person::default();

        let errors = person.validate().unwrap_err();
        assert_eq!(errors.get("username").unwrap(), USERNAME_MANDATORY);
        assert_eq!(errors.get("email").unwrap(), EMAIL_MANDATORY);
    }

    #[test]
    fn test_optional_names_not_validated() {
        let mut person = nolan();
        person.firstname = None;
        person.lastname = Some(String::new());
        assert!(person.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_payload() {
        let person: Person = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(person.username.as_deref(), Some("bob"));
        assert!(person.id.is_none());
        assert!(person.email.is_none());
    }

    #[test]
    fn test_serialize_keeps_nulls() {
        let person = Person {
            username: Some("bob".to_string()),
            ..Person::default()
        }
        .with_id(PersonId(7));

        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["id"], 7);
        assert!(value["email"].is_null());
    }

    #[test]
    fn test_field_copy() {
        let source = Person {
            username: Some("renamed".to_string()),
            ..Person::default()
        };
        let mut target = nolan().with_id(PersonId(1));

        PersonField::Username.copy(&source, &mut target);
        assert_eq!(target.username.as_deref(), Some("renamed"));
        assert_eq!(target.email.as_deref(), Some("nolan@email.com"));

        PersonField::Firstname.copy(&source, &mut target);
        assert!(target.firstname.is_none());
    }

    #[test]
    fn test_replace_attributes_keeps_id() {
        let mut target = nolan().with_id(PersonId(3));
        target.replace_attributes(Person::new("a", "b", "c", "d").with_id(PersonId(99)));

        assert_eq!(target.id, Some(PersonId(3)));
        assert_eq!(target.username.as_deref(), Some("a"));
        assert_eq!(target.lastname.as_deref(), Some("d"));
    }

    #[test]
    fn test_display() {
        let person = nolan().with_id(PersonId(1));
        assert_eq!(
            person.to_string(),
            "Person{id=1, username='chrisnolan123', email='nolan@email.com', firstname='chris', lastname='nolan'}"
        );
    }

    #[test]
    fn test_person_id_parse() {
        assert_eq!("42".parse::<PersonId>().unwrap(), PersonId(42));
        assert!("abc".parse::<PersonId>().is_err());
    }
}
