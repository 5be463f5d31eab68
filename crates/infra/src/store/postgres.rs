//! Postgres-backed catalog store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` (constraint name preserved) |
//! | Database (foreign key violation) | `23503` | `MissingReference` |
//! | Database (other) | any other | `Database` |
//! | PoolClosed / Io / other | N/A | `Database` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use coursehub_auth::HashedPassword;
use coursehub_catalog::{Course, CourseWithOwner, User, UserProfile};
use coursehub_core::{CourseId, UserId};

use super::r#trait::{CourseRepository, StoreError, UserRepository};

/// Postgres-backed store implementing both repositories over one pool.
///
/// `PgPool` is `Send + Sync` and reference-counted internally; cloning the
/// store is cheap.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

const COURSE_WITH_OWNER_SELECT: &str = r#"
    SELECT
        c.id,
        c.user_id,
        c.title,
        c.description,
        c.estimated_time,
        c.materials_needed,
        c.created_at,
        c.updated_at,
        u.first_name AS owner_first_name,
        u.last_name AS owner_last_name,
        u.email_address AS owner_email_address
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

#[async_trait]
impl UserRepository for PostgresCatalogStore {
    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                first_name,
                last_name,
                email_address,
                password_hash,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email_address)
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;

        Ok(())
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email_address, password_hash, created_at, updated_at
            FROM users
            WHERE email_address = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl CourseRepository for PostgresCatalogStore {
    #[instrument(skip(self, course), fields(course_id = %course.id, owner_id = %course.owner_id), err)]
    async fn insert(&self, course: &Course) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                id,
                user_id,
                title,
                description,
                estimated_time,
                materials_needed,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(course.owner_id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.estimated_time)
        .bind(&course.materials_needed)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_course", e))?;

        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT
                id,
                user_id,
                title,
                description,
                estimated_time,
                materials_needed,
                created_at,
                updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_course_by_id", e))?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn find_with_owner(&self, id: CourseId) -> Result<Option<CourseWithOwner>, StoreError> {
        let sql = format!("{COURSE_WITH_OWNER_SELECT} WHERE c.id = $1");
        let row = sqlx::query_as::<_, CourseWithOwnerRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_course_with_owner", e))?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), fields(course_count = tracing::field::Empty), err)]
    async fn list_with_owners(&self) -> Result<Vec<CourseWithOwner>, StoreError> {
        let sql = format!("{COURSE_WITH_OWNER_SELECT} ORDER BY c.id ASC");
        let rows = sqlx::query_as::<_, CourseWithOwnerRow>(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_courses_with_owners", e))?;

        tracing::Span::current().record("course_count", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, course), fields(course_id = %course.id), err)]
    async fn update(&self, course: &Course) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET
                title = $2,
                description = $3,
                estimated_time = $4,
                materials_needed = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.estimated_time)
        .bind(&course.materials_needed)
        .bind(course.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_course", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: CourseId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_course", e))?;

        Ok(result.rows_affected() > 0)
    }
}

pub(crate) fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            match db_err.code().as_deref() {
                Some("23505") => StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                },
                Some("23503") => StoreError::MissingReference(message),
                _ => StoreError::Database { operation, message },
            }
        }
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}

// SQLx row types

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email_address: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email_address: row.email_address,
            password_hash: HashedPassword::from_phc(row.password_hash),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: CourseId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.user_id),
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CourseWithOwnerRow {
    #[sqlx(flatten)]
    course: CourseRow,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
}

impl From<CourseWithOwnerRow> for CourseWithOwner {
    fn from(row: CourseWithOwnerRow) -> Self {
        let course: Course = row.course.into();
        let owner = UserProfile {
            id: course.owner_id,
            first_name: row.owner_first_name,
            last_name: row.owner_last_name,
            email_address: row.owner_email_address,
        };
        CourseWithOwner { course, owner }
    }
}
