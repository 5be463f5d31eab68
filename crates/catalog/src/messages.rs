//! Field names (as clients spell them) and user-facing validation messages.

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL_ADDRESS: &str = "emailAddress";
pub const PASSWORD: &str = "password";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";

pub const FIRST_NAME_REQUIRED: &str = "Please provide a First Name";
pub const LAST_NAME_REQUIRED: &str = "Please provide a Last Name";
pub const EMAIL_REQUIRED: &str = "Please provide an Email Address";
pub const EMAIL_INVALID: &str = "Please provide a valid Email Address";
pub const EMAIL_TAKEN: &str = "The Email Address you entered already exists";
pub const PASSWORD_REQUIRED: &str = "Please provide a Password";
pub const TITLE_REQUIRED: &str = "Please provide a Title";
pub const DESCRIPTION_REQUIRED: &str = "Please provide a Description";
