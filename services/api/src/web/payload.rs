//! services/api/src/web/payload.rs
//!
//! Request bodies accepted by the REST API and their conversion into core
//! inputs. Conversion trims every string, then validates, so handlers only ever
//! see clean values.

use crate::error::ApiError;
use crate::web::validation;
use chrono::{DateTime, NaiveDate, Utc};
use portfolio_core::domain::{
    NewProject, NewWork, PreferencesPatch, ProfileLinks, ProfilePatch, ProjectLinks, ProjectStatus,
};
use serde::Deserialize;
use utoipa::ToSchema;

fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Trims a value that is stored as optional; blank means "not set".
fn trim_optional(value: Option<String>) -> Option<String> {
    trim(value).filter(|v| !v.is_empty())
}

fn trim_profile_links(links: ProfileLinks) -> ProfileLinks {
    ProfileLinks {
        github: trim(links.github),
        linkedin: trim(links.linkedin),
        portfolio: trim(links.portfolio),
        twitter: trim(links.twitter),
        website: trim(links.website),
    }
}

fn trim_project_links(links: ProjectLinks) -> ProjectLinks {
    ProjectLinks {
        repo: trim_optional(links.repo),
        demo: trim_optional(links.demo),
        live: trim_optional(links.live),
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, keeping the UTC date.
fn parse_date(field: &'static str, raw: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = trim_optional(raw) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| Some(dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ApiError::Validation {
            field,
            message: format!("{} must be a date in YYYY-MM-DD format", field),
        })
}

//=========================================================================================
// Profile
//=========================================================================================

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub public_profile: Option<bool>,
    pub show_email: Option<bool>,
    pub show_phone: Option<bool>,
}

/// Body of `POST /profile`. `name` and `email` are always required; every other
/// field is merged into the stored profile only when present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub education: Option<String>,
    pub links: Option<ProfileLinks>,
    pub preferences: Option<PreferencesRequest>,
}

impl ProfileRequest {
    pub fn into_patch(self) -> Result<ProfilePatch, ApiError> {
        let name = trim(self.name);
        let email = trim(self.email);
        validation::validate_profile(name.as_deref(), email.as_deref())?;

        Ok(ProfilePatch {
            name,
            email,
            phone: trim(self.phone),
            location: trim(self.location),
            bio: trim(self.bio),
            education: trim(self.education),
            links: self.links.map(trim_profile_links),
            preferences: self.preferences.map(|p| PreferencesPatch {
                public_profile: p.public_profile,
                show_email: p.show_email,
                show_phone: p.show_phone,
            }),
        })
    }
}

//=========================================================================================
// Projects
//=========================================================================================

/// Body of `POST /projects` and `PUT /projects/{index}`. An update replaces the
/// whole entry, so omitted optional fields are cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub links: Option<ProjectLinks>,
    pub skills: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    #[schema(example = "2024-01-31")]
    pub start_date: Option<String>,
    #[schema(example = "2024-03-15")]
    pub end_date: Option<String>,
}

impl ProjectRequest {
    pub fn into_new_project(self) -> Result<NewProject, ApiError> {
        let title = trim(self.title);
        let description = trim(self.description);
        validation::validate_project(title.as_deref(), description.as_deref())?;

        Ok(NewProject {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            links: self.links.map(trim_project_links).unwrap_or_default(),
            skills: self
                .skills
                .unwrap_or_default()
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            status: self.status.unwrap_or_default(),
            start_date: parse_date("startDate", self.start_date)?,
            end_date: parse_date("endDate", self.end_date)?,
        })
    }
}

//=========================================================================================
// Work experience
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkRequest {
    pub company: Option<String>,
    pub title: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
}

impl WorkRequest {
    pub fn into_new_work(self) -> Result<NewWork, ApiError> {
        let company = trim(self.company);
        let title = trim(self.title);
        let duration = trim(self.duration);
        let description = trim(self.description);
        validation::validate_work(
            company.as_deref(),
            title.as_deref(),
            duration.as_deref(),
            description.as_deref(),
        )?;

        Ok(NewWork {
            company: company.unwrap_or_default(),
            title: title.unwrap_or_default(),
            duration: duration.unwrap_or_default(),
            description: description.unwrap_or_default(),
            location: trim_optional(self.location),
            start_date: parse_date("startDate", self.start_date)?,
            end_date: parse_date("endDate", self.end_date)?,
            current: self.current.unwrap_or(false),
        })
    }
}

//=========================================================================================
// Skills
//=========================================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SkillRequest {
    pub skill: Option<String>,
}

impl SkillRequest {
    pub fn into_skill(self) -> Result<String, ApiError> {
        let skill = trim(self.skill);
        validation::validate_skill(skill.as_deref())?;
        Ok(skill.unwrap_or_default())
    }
}

/// Body of `PUT /skills`. Documented here; the handler reads the raw JSON so a
/// non-array `skills` can be reported as a bad request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReplaceSkillsRequest {
    pub skills: Vec<String>,
}

impl ReplaceSkillsRequest {
    /// Extracts the string entries of `skills`, ignoring anything that is not a
    /// string.
    pub fn from_value(body: &serde_json::Value) -> Result<Self, ApiError> {
        let entries = body
            .get("skills")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| ApiError::BadRequest("Skills must be an array".to_string()))?;

        Ok(Self {
            skills: entries
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(|s| s.trim().to_string())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_request_is_trimmed_before_validation() {
        let request: ProfileRequest = serde_json::from_value(json!({
            "name": "  Jo  ",
            "email": " jo@x.com ",
            "links": { "github": "  https://github.com/jo " },
            "preferences": { "showPhone": true }
        }))
        .unwrap();

        let patch = request.into_patch().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Jo"));
        assert_eq!(patch.email.as_deref(), Some("jo@x.com"));
        assert_eq!(
            patch.links.unwrap().github.as_deref(),
            Some("https://github.com/jo")
        );
        assert_eq!(patch.preferences.unwrap().show_phone, Some(true));
    }

    #[test]
    fn whitespace_only_name_fails() {
        let request = ProfileRequest {
            name: Some("   ".into()),
            email: Some("jo@x.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            request.into_patch(),
            Err(ApiError::Validation { field: "name", .. })
        ));
    }

    #[test]
    fn project_defaults_and_dates() {
        let request: ProjectRequest = serde_json::from_value(json!({
            "title": "Atlas",
            "description": "A mapping tool for teams",
            "skills": [" Rust ", "", "Axum"],
            "startDate": "2024-01-31",
            "endDate": "2024-03-15T10:00:00Z"
        }))
        .unwrap();

        let project = request.into_new_project().unwrap();
        assert_eq!(project.status, ProjectStatus::Completed);
        assert_eq!(project.skills, vec!["Rust", "Axum"]);
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert_eq!(project.end_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn bad_dates_name_the_field() {
        let request = ProjectRequest {
            title: Some("Atlas".into()),
            description: Some("A mapping tool for teams".into()),
            end_date: Some("next spring".into()),
            ..Default::default()
        };
        assert!(matches!(
            request.into_new_project(),
            Err(ApiError::Validation { field: "endDate", .. })
        ));
    }

    #[test]
    fn unknown_status_is_rejected_by_serde() {
        let parsed = serde_json::from_value::<ProjectRequest>(json!({ "status": "abandoned" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn work_blank_location_is_dropped() {
        let request = WorkRequest {
            company: Some("Initech".into()),
            title: Some("Engineer".into()),
            duration: Some("2 years".into()),
            description: Some("Maintained the TPS report pipeline".into()),
            location: Some("   ".into()),
            ..Default::default()
        };
        let work = request.into_new_work().unwrap();
        assert_eq!(work.location, None);
        assert!(!work.current);
    }

    #[test]
    fn replace_skills_requires_an_array() {
        assert!(matches!(
            ReplaceSkillsRequest::from_value(&json!({ "skills": "rust" })),
            Err(ApiError::BadRequest(_))
        ));
        let parsed = ReplaceSkillsRequest::from_value(&json!({ "skills": [" Rust ", 3, "Go"] })).unwrap();
        assert_eq!(parsed.skills, vec!["Rust", "Go"]);
    }
}
