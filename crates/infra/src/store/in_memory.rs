use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use coursehub_catalog::{Course, CourseWithOwner, User};
use coursehub_core::{CourseId, UserId};

use super::r#trait::{CourseRepository, StoreError, USERS_EMAIL_UNIQUE, UserRepository};

/// In-memory catalog store.
///
/// Intended for tests/dev. Enforces the same constraints as the Postgres
/// schema: unique emails, and courses must reference an existing owner.
/// `BTreeMap` keyed by UUIDv7 ids keeps listings in creation order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    users: RwLock<BTreeMap<UserId, User>>,
    courses: RwLock<BTreeMap<CourseId, Course>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_owner(&self, course: Course) -> Result<CourseWithOwner, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        let owner = users
            .get(&course.owner_id)
            .ok_or_else(|| StoreError::MissingReference(format!("user {}", course.owner_id)))?
            .profile();
        Ok(CourseWithOwner { course, owner })
    }
}

#[async_trait]
impl UserRepository for InMemoryCatalogStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        if users.values().any(|u| u.email_address == user.email_address) {
            return Err(StoreError::UniqueViolation {
                constraint: USERS_EMAIL_UNIQUE.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.values().find(|u| u.email_address == email).cloned())
    }
}

#[async_trait]
impl CourseRepository for InMemoryCatalogStore {
    async fn insert(&self, course: &Course) -> Result<(), StoreError> {
        {
            let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
            if !users.contains_key(&course.owner_id) {
                return Err(StoreError::MissingReference(format!("user {}", course.owner_id)));
            }
        }
        let mut courses = self.courses.write().map_err(|_| StoreError::Poisoned)?;
        courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let courses = self.courses.read().map_err(|_| StoreError::Poisoned)?;
        Ok(courses.get(&id).cloned())
    }

    async fn find_with_owner(&self, id: CourseId) -> Result<Option<CourseWithOwner>, StoreError> {
        let course = {
            let courses = self.courses.read().map_err(|_| StoreError::Poisoned)?;
            courses.get(&id).cloned()
        };
        course.map(|c| self.with_owner(c)).transpose()
    }

    async fn list_with_owners(&self) -> Result<Vec<CourseWithOwner>, StoreError> {
        let courses: Vec<Course> = {
            let courses = self.courses.read().map_err(|_| StoreError::Poisoned)?;
            courses.values().cloned().collect()
        };
        courses.into_iter().map(|c| self.with_owner(c)).collect()
    }

    async fn update(&self, course: &Course) -> Result<bool, StoreError> {
        let mut courses = self.courses.write().map_err(|_| StoreError::Poisoned)?;
        match courses.get_mut(&course.id) {
            Some(existing) => {
                existing.title = course.title.clone();
                existing.description = course.description.clone();
                existing.estimated_time = course.estimated_time.clone();
                existing.materials_needed = course.materials_needed.clone();
                existing.updated_at = course.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: CourseId) -> Result<bool, StoreError> {
        let mut courses = self.courses.write().map_err(|_| StoreError::Poisoned)?;
        Ok(courses.remove(&id).is_some())
    }
}
