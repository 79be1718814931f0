//! PostgreSQL person store
//!
//! Rows live in a single `person` table keyed by a `BIGSERIAL` id. Saving under
//! an explicit id is an upsert that also pushes the id sequence past the
//! highest stored id.

use sqlx::PgPool;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{PersonStore, RepositoryResult};
use crate::person::{Person, PersonId};

/// Person store backed by a `sqlx` PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `person` table if it does not exist
    ///
    /// Should be called once during application startup.
    pub async fn migrate(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS person (
                id BIGSERIAL PRIMARY KEY,
                username TEXT,
                email TEXT,
                firstname TEXT,
                lastname TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| op_error(e, RepositoryOperation::Migrate))?;

        Ok(())
    }

    async fn insert(&self, person: &Person) -> RepositoryResult<PersonRow> {
        sqlx::query_as::<_, PersonRow>(
            r#"
            INSERT INTO person (username, email, firstname, lastname)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, firstname, lastname
            "#,
        )
        .bind(&person.username)
        .bind(&person.email)
        .bind(&person.firstname)
        .bind(&person.lastname)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| op_error(e, RepositoryOperation::Save))
    }

    async fn upsert(&self, id: PersonId, person: &Person) -> RepositoryResult<PersonRow> {
        let save_error = |e: sqlx::Error| {
            op_error(e, RepositoryOperation::Save).with_entity("Person", id.to_string())
        };

        let mut tx = self.pool.begin().await.map_err(save_error)?;

        let row = sqlx::query_as::<_, PersonRow>(
            r#"
            INSERT INTO person (id, username, email, firstname, lastname)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                firstname = EXCLUDED.firstname,
                lastname = EXCLUDED.lastname
            RETURNING id, username, email, firstname, lastname
            "#,
        )
        .bind(id.get())
        .bind(&person.username)
        .bind(&person.email)
        .bind(&person.firstname)
        .bind(&person.lastname)
        .fetch_one(&mut *tx)
        .await
        .map_err(save_error)?;

        // Generated ids must never land on an id that was written explicitly
        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('person', 'id'),
                GREATEST((SELECT MAX(id) FROM person), 1)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(save_error)?;

        tx.commit().await.map_err(save_error)?;
        Ok(row)
    }
}

impl PersonStore for PgPersonStore {
    async fn save(&self, person: Person) -> RepositoryResult<Person> {
        let row = match person.id {
            Some(id) => self.upsert(id, &person).await?,
            None => self.insert(&person).await?,
        };
        Ok(row.into())
    }

    async fn find_by_id(&self, id: PersonId) -> RepositoryResult<Option<Person>> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, username, email, firstname, lastname FROM person WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            op_error(e, RepositoryOperation::FindById).with_entity("Person", id.to_string())
        })?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(
            "SELECT id, username, email, firstname, lastname FROM person ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| op_error(e, RepositoryOperation::FindAll))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_by_id(&self, id: PersonId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM person WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                op_error(e, RepositoryOperation::Delete).with_entity("Person", id.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM person")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| op_error(e, RepositoryOperation::Count))?;

        Ok(count.max(0) as u64)
    }
}

fn op_error(err: sqlx::Error, operation: RepositoryOperation) -> RepositoryError {
    RepositoryError::from(err).with_operation(operation)
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct PersonRow {
    id: i64,
    username: Option<String>,
    email: Option<String>,
    firstname: Option<String>,
    lastname: Option<String>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: Some(PersonId(row.id)),
            username: row.username,
            email: row.email,
            firstname: row.firstname,
            lastname: row.lastname,
        }
    }
}
