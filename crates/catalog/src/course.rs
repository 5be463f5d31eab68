//! Courses and their owners.

use chrono::{DateTime, Utc};

use coursehub_core::{CourseId, DomainError, DomainResult, UserId, ValidationErrors};

use crate::messages;
use crate::non_blank;
use crate::user::UserProfile;

/// A persisted course. `owner_id` always references an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// New course owned by `owner_id`.
    pub fn create(owner_id: UserId, fields: CourseFields, now: DateTime<Utc>) -> Self {
        Self {
            id: CourseId::new(),
            owner_id,
            title: fields.title,
            description: fields.description,
            estimated_time: fields.estimated_time,
            materials_needed: fields.materials_needed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields. Identity, owner and `created_at` never change.
    pub fn apply(&mut self, fields: CourseFields, now: DateTime<Utc>) {
        self.title = fields.title;
        self.description = fields.description;
        self.estimated_time = fields.estimated_time;
        self.materials_needed = fields.materials_needed;
        self.updated_at = now;
    }
}

/// A course joined with a summary of its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseWithOwner {
    pub course: Course,
    pub owner: UserProfile,
}

/// Raw course input (create and full-replacement update).
#[derive(Debug, Clone, Default)]
pub struct CourseInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl CourseInput {
    pub fn validate(self) -> DomainResult<CourseFields> {
        let mut errors = ValidationErrors::new();

        let title = non_blank(self.title);
        if title.is_none() {
            errors.push(messages::TITLE, messages::TITLE_REQUIRED);
        }

        let description = non_blank(self.description);
        if description.is_none() {
            errors.push(messages::DESCRIPTION, messages::DESCRIPTION_REQUIRED);
        }

        match (title, description) {
            (Some(title), Some(description)) => Ok(CourseFields {
                title,
                description,
                estimated_time: non_blank(self.estimated_time),
                materials_needed: non_blank(self.materials_needed),
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

/// Editable course fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
}

impl CourseFields {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
