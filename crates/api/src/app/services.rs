//! Application services: repository wiring plus the use cases the handlers call.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};

use coursehub_auth::{BasicCredentials, hash_password, verify_password_or_placeholder};
use coursehub_catalog::{
    Course, CourseInput, CourseWithOwner, RegisterUser, User, normalize_email,
};
use coursehub_core::{CourseId, UserId};
use coursehub_infra::{
    CourseRepository, InMemoryCatalogStore, PostgresCatalogStore, UserRepository, db,
};

use crate::app::errors::ApiError;
use crate::authz::authorize_course_change;
use crate::config::{AppConfig, Persistence};
use crate::context::CurrentUser;

/// Repositories shared by every request.
#[derive(Clone)]
pub struct AppServices {
    users: Arc<dyn UserRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl AppServices {
    pub fn new(users: Arc<dyn UserRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { users, courses }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryCatalogStore::new()))
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::from_store(Arc::new(PostgresCatalogStore::new(pool)))
    }

    /// Wire both repositories to one store implementing them.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + CourseRepository + 'static,
    {
        Self::new(store.clone(), store)
    }

    // -------------------------
    // Users
    // -------------------------

    /// Validate, hash the password, then persist.
    ///
    /// Hashing happens exactly once, here, before the first insert.
    pub async fn register_user(&self, input: RegisterUser) -> Result<UserId, ApiError> {
        let registration = input.validate()?;

        let plaintext = registration.password().to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&plaintext)).await??;

        let user = registration.into_user(password_hash, Utc::now());
        self.users.insert(&user).await?;

        info!(user_id = %user.id, "user registered");
        Ok(user.id)
    }

    /// Resolve Basic credentials to a stored user.
    ///
    /// Unknown emails and wrong passwords both yield `Unauthorized` after the
    /// same hashing work; the reason only goes to the log.
    pub async fn authenticate(&self, credentials: &BasicCredentials) -> Result<User, ApiError> {
        let email = normalize_email(credentials.email());
        let user = self.users.find_by_email(&email).await?;

        let plaintext = credentials.password().to_owned();
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matches = tokio::task::spawn_blocking(move || {
            verify_password_or_placeholder(&plaintext, stored.as_ref())
        })
        .await??;

        match user {
            Some(user) if matches => Ok(user),
            Some(user) => {
                warn!(user_id = %user.id, "authentication failed: password mismatch");
                Err(ApiError::Unauthorized)
            }
            None => {
                warn!("authentication failed: unknown email");
                Err(ApiError::Unauthorized)
            }
        }
    }

    // -------------------------
    // Courses
    // -------------------------

    pub async fn list_courses(&self) -> Result<Vec<CourseWithOwner>, ApiError> {
        Ok(self.courses.list_with_owners().await?)
    }

    pub async fn get_course(&self, id: CourseId) -> Result<CourseWithOwner, ApiError> {
        self.courses
            .find_with_owner(id)
            .await?
            .ok_or(ApiError::NotFound)
    }

    pub async fn create_course(
        &self,
        current: &CurrentUser,
        input: CourseInput,
    ) -> Result<CourseId, ApiError> {
        let fields = input.validate()?;
        let course = Course::create(current.user_id(), fields, Utc::now());
        self.courses.insert(&course).await?;

        info!(course_id = %course.id, owner_id = %course.owner_id, "course created");
        Ok(course.id)
    }

    /// Load a course the caller is about to change.
    ///
    /// Existence is checked first, then ownership; the body is only looked at
    /// afterwards, by [`AppServices::replace_course`].
    pub async fn course_for_change(
        &self,
        current: &CurrentUser,
        id: CourseId,
    ) -> Result<Course, ApiError> {
        let course = self.courses.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        authorize_course_change(current, &course)?;
        Ok(course)
    }

    /// Full replacement of the editable fields of an authorized course.
    pub async fn replace_course(&self, mut course: Course, input: CourseInput) -> Result<(), ApiError> {
        let fields = input.validate()?;
        course.apply(fields, Utc::now());

        if !self.courses.update(&course).await? {
            return Err(ApiError::NotFound);
        }
        info!(course_id = %course.id, "course updated");
        Ok(())
    }

    pub async fn delete_course(&self, current: &CurrentUser, id: CourseId) -> Result<(), ApiError> {
        let course = self.course_for_change(current, id).await?;

        if !self.courses.delete(course.id).await? {
            return Err(ApiError::NotFound);
        }
        info!(course_id = %course.id, "course deleted");
        Ok(())
    }
}

/// Build the repositories selected by configuration.
///
/// With Postgres this connects the pool and, unless disabled, applies the
/// embedded migrations before the server starts accepting requests.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.persistence {
        Persistence::InMemory => {
            info!("using in-memory stores");
            Ok(AppServices::in_memory())
        }
        Persistence::Postgres {
            database_url,
            max_connections,
            run_migrations,
        } => {
            let pool = db::connect(database_url, *max_connections)
                .await
                .context("failed to connect to postgres")?;
            if *run_migrations {
                db::run_migrations(&pool)
                    .await
                    .context("failed to apply migrations")?;
            }
            info!(max_connections, "using postgres stores");
            Ok(AppServices::postgres(pool))
        }
    }
}
