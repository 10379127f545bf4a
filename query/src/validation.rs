//! Declarative per-entity form validation.
//!
//! Each form type enumerates its field constraints in [`Validate::validate`],
//! producing a list of [`FieldIssue`]s that [`format_errors`] reduces to a
//! field → message map for inline feedback. Field names in issues are the
//! wire-facing camelCase names, matching what the form inputs are bound to.
//!
//! Forms derive serde and double as JSON request payloads for the mutation
//! hooks.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::models::{Department, Priority, ProjectStatus, TaskStatus, UserRole};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s()\-]{10,}$").expect("phone pattern"));
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("url pattern"));

/// Characters the password complexity rule accepts as "special".
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Wire-facing (camelCase) field name.
    pub field: &'static str,
    /// Message to render next to the field.
    pub message: String,
}

impl FieldIssue {
    /// Build an issue for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reduce issues to a field → message map.
///
/// Only the first issue per field surfaces; later issues for the same field
/// are dropped. This mirrors inline form feedback, which shows one message
/// per input, and is a documented simplification rather than an "all errors"
/// contract.
pub fn format_errors(issues: &[FieldIssue]) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    for issue in issues {
        errors
            .entry(issue.field.to_string())
            .or_insert_with(|| issue.message.clone());
    }
    errors
}

/// A form that can check itself against its field contract.
pub trait Validate {
    /// All constraint violations, in field-declaration order.
    fn validate(&self) -> Result<(), Vec<FieldIssue>>;

    /// Formatted field → message map, empty when valid.
    fn field_errors(&self) -> HashMap<String, String> {
        match self.validate() {
            Ok(()) => HashMap::new(),
            Err(issues) => format_errors(&issues),
        }
    }

    /// Whether the form currently passes.
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// Rule helpers. Each pushes at most one issue and returns whether the value
// passed, so callers can chain dependent checks.

fn require(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, message));
        false
    } else {
        true
    }
}

fn min_len(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) -> bool {
    if value.chars().count() < min {
        issues.push(FieldIssue::new(field, message));
        false
    } else {
        true
    }
}

fn max_len(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &str,
    max: usize,
    message: &str,
) -> bool {
    if value.chars().count() > max {
        issues.push(FieldIssue::new(field, message));
        false
    } else {
        true
    }
}

fn pattern(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &str,
    regex: &Regex,
    message: &str,
) -> bool {
    if regex.is_match(value) {
        true
    } else {
        issues.push(FieldIssue::new(field, message));
        false
    }
}

fn member_of<E: FromStr>(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &str,
    message: &str,
) -> bool {
    if E::from_str(value).is_ok() {
        true
    } else {
        issues.push(FieldIssue::new(field, message));
        false
    }
}

fn future_date(
    issues: &mut Vec<FieldIssue>,
    field: &'static str,
    value: &Option<DateTime<Utc>>,
    message: &str,
) -> bool {
    match value {
        Some(date) if *date <= Utc::now() => {
            issues.push(FieldIssue::new(field, message));
            false
        }
        _ => true,
    }
}

/// The fixed complexity rule for passwords: at least 8 characters, one
/// lowercase, one uppercase, one digit, one special from `@$!%*?&`, and no
/// characters outside that charset.
fn is_strong_password(value: &str) -> bool {
    let mut lower = false;
    let mut upper = false;
    let mut digit = false;
    let mut special = false;
    for c in value.chars() {
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            _ if PASSWORD_SPECIALS.contains(c) => special = true,
            _ => return false,
        }
    }
    value.chars().count() >= 8 && lower && upper && digit && special
}

const PASSWORD_COMPLEXITY_MESSAGE: &str = "Password must contain at least one uppercase letter, \
     one lowercase letter, one number, and one special character";

fn person_name(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str) {
    if !require(issues, field, value, "Name is required") {
        return;
    }
    min_len(issues, field, value, 2, "Name must be at least 2 characters");
    max_len(issues, field, value, 100, "Name must be less than 100 characters");
    pattern(
        issues,
        field,
        value,
        &NAME_PATTERN,
        "Name can only contain letters and spaces",
    );
}

fn email_address(issues: &mut Vec<FieldIssue>, field: &'static str, value: &str) {
    if require(issues, field, value, "Email is required") {
        pattern(
            issues,
            field,
            value,
            &EMAIL_PATTERN,
            "Please enter a valid email address",
        );
    }
}

fn optional_phone(issues: &mut Vec<FieldIssue>, field: &'static str, value: &Option<String>) {
    if let Some(phone) = value.as_deref().filter(|p| !p.is_empty()) {
        pattern(
            issues,
            field,
            phone,
            &PHONE_PATTERN,
            "Please enter a valid phone number",
        );
    }
}

/// Fields for creating or editing a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    /// Project name, 3-100 characters.
    pub name: String,
    /// Description, 10-1000 characters.
    pub description: String,
    /// One of the [`Priority`] labels.
    pub priority: String,
    /// One of the [`ProjectStatus`] labels, if chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Deadline; must lie in the future when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    /// Budget in dollars, 0 to 10,000,000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Member ids assigned to the project.
    #[serde(default)]
    pub team: Vec<String>,
}

impl Validate for ProjectForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if require(&mut issues, "name", &self.name, "Project name is required") {
            min_len(
                &mut issues,
                "name",
                &self.name,
                3,
                "Project name must be at least 3 characters",
            );
            max_len(
                &mut issues,
                "name",
                &self.name,
                100,
                "Project name must be less than 100 characters",
            );
        }

        if require(&mut issues, "description", &self.description, "Description is required") {
            min_len(
                &mut issues,
                "description",
                &self.description,
                10,
                "Description must be at least 10 characters",
            );
            max_len(
                &mut issues,
                "description",
                &self.description,
                1000,
                "Description must be less than 1000 characters",
            );
        }

        member_of::<Priority>(
            &mut issues,
            "priority",
            &self.priority,
            "Please select a valid priority level",
        );

        if let Some(status) = self.status.as_deref() {
            member_of::<ProjectStatus>(
                &mut issues,
                "status",
                status,
                "Please select a valid status",
            );
        }

        future_date(
            &mut issues,
            "deadline",
            &self.deadline,
            "Deadline must be in the future",
        );

        if let Some(budget) = self.budget {
            if budget < 0.0 {
                issues.push(FieldIssue::new("budget", "Budget must be a positive number"));
            } else if budget > 10_000_000.0 {
                issues.push(FieldIssue::new("budget", "Budget cannot exceed $10,000,000"));
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Fields for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskForm {
    /// Task title, 3-200 characters.
    pub title: String,
    /// Description, 5-2000 characters.
    pub description: String,
    /// One of the [`Priority`] labels.
    pub priority: String,
    /// One of the [`TaskStatus`] labels, if chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Owning project.
    pub project_id: String,
    /// Assigned member.
    pub assignee: String,
    /// Due date; must lie in the future when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Planned effort, 0.5 to 1000 hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f32>,
    /// Logged effort, non-negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f32>,
    /// Free-form labels, at most 10.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for TaskForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if require(&mut issues, "title", &self.title, "Task title is required") {
            min_len(
                &mut issues,
                "title",
                &self.title,
                3,
                "Task title must be at least 3 characters",
            );
            max_len(
                &mut issues,
                "title",
                &self.title,
                200,
                "Task title must be less than 200 characters",
            );
        }

        if require(&mut issues, "description", &self.description, "Description is required") {
            min_len(
                &mut issues,
                "description",
                &self.description,
                5,
                "Description must be at least 5 characters",
            );
            max_len(
                &mut issues,
                "description",
                &self.description,
                2000,
                "Description must be less than 2000 characters",
            );
        }

        member_of::<Priority>(
            &mut issues,
            "priority",
            &self.priority,
            "Please select a valid priority level",
        );

        if let Some(status) = self.status.as_deref() {
            member_of::<TaskStatus>(&mut issues, "status", status, "Please select a valid status");
        }

        require(&mut issues, "projectId", &self.project_id, "Please select a project");
        require(
            &mut issues,
            "assignee",
            &self.assignee,
            "Please assign this task to someone",
        );

        future_date(
            &mut issues,
            "dueDate",
            &self.due_date,
            "Due date must be in the future",
        );

        if let Some(hours) = self.estimated_hours {
            if hours < 0.5 {
                issues.push(FieldIssue::new(
                    "estimatedHours",
                    "Estimated hours must be at least 0.5",
                ));
            } else if hours > 1000.0 {
                issues.push(FieldIssue::new(
                    "estimatedHours",
                    "Estimated hours cannot exceed 1000",
                ));
            }
        }

        if let Some(hours) = self.actual_hours {
            if hours < 0.0 {
                issues.push(FieldIssue::new("actualHours", "Actual hours cannot be negative"));
            }
        }

        if self.tags.len() > 10 {
            issues.push(FieldIssue::new("tags", "Maximum 10 tags allowed"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Fields for creating or editing a team member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    /// Full name: letters and spaces, 2-100 characters.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// One of the [`UserRole`] labels.
    pub role: String,
    /// One of the [`Department`] labels.
    pub department: String,
    /// Phone number, permissively checked when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Avatar URL, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Validate for UserForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        person_name(&mut issues, "name", &self.name);
        email_address(&mut issues, "email", &self.email);

        member_of::<UserRole>(&mut issues, "role", &self.role, "Please select a valid role");
        member_of::<Department>(
            &mut issues,
            "department",
            &self.department,
            "Please select a valid department",
        );

        optional_phone(&mut issues, "phone", &self.phone);

        if let Some(avatar) = self.avatar.as_deref().filter(|a| !a.is_empty()) {
            pattern(
                &mut issues,
                "avatar",
                avatar,
                &URL_PATTERN,
                "Please enter a valid URL",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Sign-in credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// Account email.
    pub email: String,
    /// Account password, at least 6 characters.
    pub password: String,
}

impl Validate for LoginForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        email_address(&mut issues, "email", &self.email);

        if require(&mut issues, "password", &self.password, "Password is required") {
            min_len(
                &mut issues,
                "password",
                &self.password,
                6,
                "Password must be at least 6 characters",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Account registration fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Full name: letters and spaces, 2-100 characters.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Password matching the complexity rule.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        person_name(&mut issues, "name", &self.name);
        email_address(&mut issues, "email", &self.email);

        if require(&mut issues, "password", &self.password, "Password is required") {
            let long_enough = min_len(
                &mut issues,
                "password",
                &self.password,
                8,
                "Password must be at least 8 characters",
            );
            if long_enough && !is_strong_password(&self.password) {
                issues.push(FieldIssue::new("password", PASSWORD_COMPLEXITY_MESSAGE));
            }
        }

        if require(
            &mut issues,
            "confirmPassword",
            &self.confirm_password,
            "Please confirm your password",
        ) && self.password != self.confirm_password
        {
            issues.push(FieldIssue::new("confirmPassword", "Passwords don't match"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Password change fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    /// The password being replaced.
    pub current_password: String,
    /// New password matching the complexity rule.
    pub new_password: String,
    /// Must equal `new_password`.
    pub confirm_password: String,
}

impl Validate for PasswordChangeForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        require(
            &mut issues,
            "currentPassword",
            &self.current_password,
            "Current password is required",
        );

        if require(
            &mut issues,
            "newPassword",
            &self.new_password,
            "New password is required",
        ) {
            let long_enough = min_len(
                &mut issues,
                "newPassword",
                &self.new_password,
                8,
                "Password must be at least 8 characters",
            );
            if long_enough && !is_strong_password(&self.new_password) {
                issues.push(FieldIssue::new("newPassword", PASSWORD_COMPLEXITY_MESSAGE));
            }
        }

        if require(
            &mut issues,
            "confirmPassword",
            &self.confirm_password,
            "Please confirm your new password",
        ) && self.new_password != self.confirm_password
        {
            issues.push(FieldIssue::new("confirmPassword", "Passwords don't match"));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Profile settings fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateForm {
    /// Full name: letters and spaces, 2-100 characters.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Short bio, at most 500 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Phone number, permissively checked when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Location, at most 100 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Validate for ProfileUpdateForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        person_name(&mut issues, "name", &self.name);
        email_address(&mut issues, "email", &self.email);

        if let Some(bio) = self.bio.as_deref() {
            max_len(
                &mut issues,
                "bio",
                bio,
                500,
                "Bio must be less than 500 characters",
            );
        }

        optional_phone(&mut issues, "phone", &self.phone);

        if let Some(location) = self.location.as_deref() {
            max_len(
                &mut issues,
                "location",
                location,
                100,
                "Location must be less than 100 characters",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// A new comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentForm {
    /// Comment body, 2-1000 characters.
    pub content: String,
}

impl Validate for CommentForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if require(&mut issues, "content", &self.content, "Comment cannot be empty") {
            min_len(
                &mut issues,
                "content",
                &self.content,
                2,
                "Comment must be at least 2 characters",
            );
            max_len(
                &mut issues,
                "content",
                &self.content,
                1000,
                "Comment must be less than 1000 characters",
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// A search box submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    /// Query text, at most 100 characters. Empty is allowed.
    pub query: String,
}

impl Validate for SearchForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        max_len(
            &mut issues,
            "query",
            &self.query,
            100,
            "Search query must be less than 100 characters",
        );

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// An upload candidate, checked against the configured limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadForm {
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    pub content_type: String,
}

impl Validate for FileUploadForm {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let config = AppConfig::global();
        let mut issues = Vec::new();

        if self.size > config.max_file_size {
            issues.push(FieldIssue::new(
                "file",
                format!(
                    "File size must be less than {}MB",
                    config.max_file_size / (1024 * 1024)
                ),
            ));
        }
        if !config.allowed_file_types.iter().any(|t| t == &self.content_type) {
            issues.push(FieldIssue::new(
                "file",
                "File must be a JPEG, PNG, GIF, WebP, or PDF",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn valid_project() -> ProjectForm {
        ProjectForm {
            name: "Website Revamp".into(),
            description: "Ten+ chars here".into(),
            priority: "High".into(),
            ..ProjectForm::default()
        }
    }

    #[test]
    fn a_well_formed_project_passes() {
        assert!(valid_project().is_valid());
    }

    #[test]
    fn a_short_project_name_is_rejected_on_name() {
        let form = ProjectForm {
            name: "ab".into(),
            ..valid_project()
        };
        let errors = form.field_errors();
        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Project name must be at least 3 characters")
        );
    }

    #[test]
    fn an_empty_project_name_reports_required_first() {
        let form = ProjectForm {
            name: "".into(),
            ..valid_project()
        };
        let errors = form.field_errors();
        assert_eq!(
            errors.get("name").map(String::as_str),
            Some("Project name is required")
        );
    }

    #[test]
    fn priority_must_be_a_known_label() {
        let form = ProjectForm {
            priority: "Urgent".into(),
            ..valid_project()
        };
        let errors = form.field_errors();
        assert_eq!(
            errors.get("priority").map(String::as_str),
            Some("Please select a valid priority level")
        );
    }

    #[test]
    fn a_past_deadline_is_rejected() {
        let form = ProjectForm {
            deadline: Some(Utc::now() - Duration::days(1)),
            ..valid_project()
        };
        assert_eq!(
            form.field_errors().get("deadline").map(String::as_str),
            Some("Deadline must be in the future")
        );

        let future = ProjectForm {
            deadline: Some(Utc::now() + Duration::days(30)),
            ..valid_project()
        };
        assert!(future.is_valid());
    }

    #[test]
    fn budget_bounds_are_enforced() {
        let negative = ProjectForm {
            budget: Some(-1.0),
            ..valid_project()
        };
        assert_eq!(
            negative.field_errors().get("budget").map(String::as_str),
            Some("Budget must be a positive number")
        );

        let excessive = ProjectForm {
            budget: Some(20_000_000.0),
            ..valid_project()
        };
        assert_eq!(
            excessive.field_errors().get("budget").map(String::as_str),
            Some("Budget cannot exceed $10,000,000")
        );
    }

    fn valid_register() -> RegisterForm {
        RegisterForm {
            name: "Sarah Johnson".into(),
            email: "sarah@example.com".into(),
            password: "Abcdefg1!".into(),
            confirm_password: "Abcdefg1!".into(),
        }
    }

    #[test]
    fn registration_with_matching_passwords_passes() {
        assert!(valid_register().is_valid());
    }

    #[test]
    fn mismatched_confirmation_lands_on_confirm_password() {
        let form = RegisterForm {
            confirm_password: "different".into(),
            ..valid_register()
        };
        let errors = form.field_errors();
        assert_eq!(
            errors.get("confirmPassword").map(String::as_str),
            Some("Passwords don't match")
        );
        assert!(
            !errors.contains_key("password"),
            "the valid password field stays clean"
        );
    }

    #[test]
    fn weak_passwords_fail_the_complexity_rule() {
        for weak in ["alllowercase1!", "ALLUPPERCASE1!", "NoDigits!!", "NoSpecial11", "Sh0rt!"] {
            let form = RegisterForm {
                password: weak.into(),
                confirm_password: weak.into(),
                ..valid_register()
            };
            assert!(
                form.field_errors().contains_key("password"),
                "{weak:?} should be rejected"
            );
        }
    }

    #[test]
    fn password_charset_is_closed() {
        // A space is outside the accepted charset even with all classes present.
        assert!(!is_strong_password("Abcdef 1!"));
        assert!(is_strong_password("Abcdefg1!"));
    }

    #[test]
    fn name_charset_excludes_digits() {
        let form = UserForm {
            name: "Sarah 2".into(),
            email: "sarah@example.com".into(),
            role: "Admin".into(),
            department: "Engineering".into(),
            ..UserForm::default()
        };
        assert_eq!(
            form.field_errors().get("name").map(String::as_str),
            Some("Name can only contain letters and spaces")
        );
    }

    #[test]
    fn phone_is_only_checked_when_present() {
        let base = UserForm {
            name: "Sarah Johnson".into(),
            email: "sarah@example.com".into(),
            role: "Admin".into(),
            department: "Engineering".into(),
            ..UserForm::default()
        };
        assert!(base.is_valid());

        let with_phone = UserForm {
            phone: Some("+1 (555) 123-4567".into()),
            ..base.clone()
        };
        assert!(with_phone.is_valid());

        let bad_phone = UserForm {
            phone: Some("555".into()),
            ..base
        };
        assert_eq!(
            bad_phone.field_errors().get("phone").map(String::as_str),
            Some("Please enter a valid phone number")
        );
    }

    #[test]
    fn login_accepts_shorter_passwords_than_registration() {
        let form = LoginForm {
            email: "sarah@example.com".into(),
            password: "simple".into(),
        };
        assert!(form.is_valid());
    }

    #[test]
    fn format_errors_keeps_the_first_issue_per_field() {
        let issues = vec![
            FieldIssue::new("name", "first"),
            FieldIssue::new("name", "second"),
            FieldIssue::new("email", "third"),
        ];
        let errors = format_errors(&issues);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").map(String::as_str), Some("first"));
        assert_eq!(errors.get("email").map(String::as_str), Some("third"));
    }

    #[test]
    fn file_upload_respects_the_configured_limits() {
        let good = FileUploadForm {
            file_name: "design.png".into(),
            size: 1024,
            content_type: "image/png".into(),
        };
        assert!(good.is_valid());

        let too_big = FileUploadForm {
            size: 11 * 1024 * 1024,
            ..good.clone()
        };
        assert_eq!(
            too_big.field_errors().get("file").map(String::as_str),
            Some("File size must be less than 10MB")
        );

        let wrong_type = FileUploadForm {
            content_type: "application/zip".into(),
            ..good
        };
        assert!(wrong_type.field_errors().contains_key("file"));
    }

    #[test]
    fn search_allows_empty_but_bounds_length() {
        assert!(SearchForm { query: String::new() }.is_valid());
        assert!(!SearchForm {
            query: "x".repeat(101)
        }
        .is_valid());
    }

    #[test]
    fn password_change_checks_the_new_password() {
        let form = PasswordChangeForm {
            current_password: "old-secret".into(),
            new_password: "Abcdefg1!".into(),
            confirm_password: "Abcdefg1!".into(),
        };
        assert!(form.is_valid());

        let mismatched = PasswordChangeForm {
            confirm_password: "other".into(),
            ..form
        };
        assert_eq!(
            mismatched
                .field_errors()
                .get("confirmPassword")
                .map(String::as_str),
            Some("Passwords don't match")
        );
    }
}
