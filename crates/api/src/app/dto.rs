use serde::Deserialize;

use coursehub_catalog::{CourseInput, CourseWithOwner, RegisterUser, UserProfile};

// -------------------------
// Request DTOs
// -------------------------

/// Every field is optional here so that missing fields surface as validation
/// messages rather than deserialization failures.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl From<CreateUserRequest> for RegisterUser {
    fn from(body: CreateUserRequest) -> Self {
        RegisterUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email_address: body.email_address,
            password: body.password,
        }
    }
}

/// Body of `POST /courses` and `PUT /courses/:id`.
///
/// A `userId` in the body is ignored: ownership comes from the credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl From<CourseRequest> for CourseInput {
    fn from(body: CourseRequest) -> Self {
        CourseInput {
            title: body.title,
            description: body.description,
            estimated_time: body.estimated_time,
            materials_needed: body.materials_needed,
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn user_to_json(profile: &UserProfile) -> serde_json::Value {
    serde_json::json!({
        "id": profile.id.to_string(),
        "firstName": profile.first_name,
        "lastName": profile.last_name,
        "emailAddress": profile.email_address,
    })
}

pub fn course_to_json(entry: &CourseWithOwner) -> serde_json::Value {
    let course = &entry.course;
    serde_json::json!({
        "id": course.id.to_string(),
        "title": course.title,
        "description": course.description,
        "estimatedTime": course.estimated_time,
        "materialsNeeded": course.materials_needed,
        "userId": course.owner_id.to_string(),
        "user": user_to_json(&entry.owner),
    })
}
