//! services/api/src/web/validation.rs
//!
//! Field rules applied to inbound payloads before the store is touched.
//! Every check runs on already-trimmed values and reports the first field that
//! fails.

use crate::error::ApiError;
use portfolio_core::domain::MIN_SKILL_LEN;
use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

fn min_len(field: &'static str, value: Option<&str>, min: usize, message: &str) -> Result<(), ApiError> {
    match value {
        Some(v) if v.chars().count() >= min => Ok(()),
        _ => Err(ApiError::Validation {
            field,
            message: message.to_string(),
        }),
    }
}

pub fn validate_profile(name: Option<&str>, email: Option<&str>) -> Result<(), ApiError> {
    min_len("name", name, 2, "Name must be at least 2 characters long")?;
    match email {
        Some(email) if is_valid_email(email) => Ok(()),
        _ => Err(ApiError::Validation {
            field: "email",
            message: "Valid email is required".to_string(),
        }),
    }
}

pub fn validate_project(title: Option<&str>, description: Option<&str>) -> Result<(), ApiError> {
    min_len("title", title, 3, "Project title must be at least 3 characters long")?;
    min_len(
        "description",
        description,
        10,
        "Project description must be at least 10 characters long",
    )
}

pub fn validate_work(
    company: Option<&str>,
    title: Option<&str>,
    duration: Option<&str>,
    description: Option<&str>,
) -> Result<(), ApiError> {
    min_len("company", company, 2, "Company name must be at least 2 characters long")?;
    min_len("title", title, 2, "Job title must be at least 2 characters long")?;
    min_len("duration", duration, 3, "Duration is required")?;
    min_len(
        "description",
        description,
        10,
        "Job description must be at least 10 characters long",
    )
}

pub fn validate_skill(skill: Option<&str>) -> Result<(), ApiError> {
    min_len("skill", skill, MIN_SKILL_LEN, "Skill must be at least 2 characters long")
}
