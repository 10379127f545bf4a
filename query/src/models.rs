//! Domain entities exchanged with the ProjectFlow API.
//!
//! Wire format is camelCase JSON; categorical fields keep their display
//! strings ("On Hold", "To Do") on the wire, and `FromStr` accepts exactly
//! those strings, which is what enum-membership validation leans on.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let label = match self {
                    $(Self::$variant => $label,)+
                };
                write!(f, "{label}")
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok(Self::$variant),)+
                    other => Err(AppError::validation(format!(
                        concat!("invalid ", stringify!($name), ": {}"),
                        other
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Urgency of a project or task.
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

wire_enum! {
    /// Lifecycle stage of a project.
    ProjectStatus {
        Planning => "Planning",
        Active => "Active",
        OnHold => "On Hold",
        Completed => "Completed",
        Cancelled => "Cancelled",
    }
}

wire_enum! {
    /// Kanban column of a task.
    TaskStatus {
        ToDo => "To Do",
        InProgress => "In Progress",
        Review => "Review",
        Done => "Done",
    }
}

wire_enum! {
    /// Role of a team member.
    UserRole {
        Admin => "Admin",
        Manager => "Manager",
        Developer => "Developer",
        Designer => "Designer",
        Qa => "QA",
    }
}

wire_enum! {
    /// Organizational unit a member belongs to.
    Department {
        Engineering => "Engineering",
        Design => "Design",
        Product => "Product",
        Marketing => "Marketing",
        Sales => "Sales",
        Hr => "HR",
        Finance => "Finance",
        Operations => "Operations",
    }
}

wire_enum! {
    /// Presence indicator shown next to an avatar.
    Presence {
        Online => "online",
        Offline => "offline",
        Away => "away",
    }
}

/// A team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Avatar image URL.
    pub avatar: String,
    /// Role within the team.
    pub role: UserRole,
    /// Presence indicator.
    pub status: Presence,
    /// Organizational unit.
    pub department: String,
    /// Date the member joined.
    pub join_date: String,
}

/// A project with its team and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Opaque identifier.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Longer description.
    pub description: String,
    /// The member responsible for the project.
    pub owner: User,
    /// Lifecycle stage.
    pub status: ProjectStatus,
    /// Urgency.
    pub priority: Priority,
    /// Completion in percent, 0-100.
    pub progress: u8,
    /// Start date (ISO string on the wire).
    pub start_date: String,
    /// Deadline (ISO string on the wire).
    pub deadline: String,
    /// Allocated budget.
    pub budget: f64,
    /// Assigned members.
    pub team: Vec<User>,
    /// Tasks under this project.
    pub tasks: Vec<Task>,
    /// Free-form labels.
    pub tags: Vec<String>,
}

/// A unit of work on the Kanban board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Kanban column.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: Priority,
    /// The member working on it.
    pub assignee: User,
    /// Owning project.
    pub project_id: String,
    /// Due date (ISO string on the wire).
    pub due_date: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Planned effort in hours.
    pub estimated_hours: f32,
    /// Logged effort in hours.
    pub actual_hours: f32,
    /// Free-form labels.
    pub tags: Vec<String>,
    /// Discussion thread.
    pub comments: Vec<Comment>,
}

/// A comment on a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Opaque identifier.
    pub id: String,
    /// Author.
    pub user: User,
    /// Comment body.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// An entry in the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Opaque identifier.
    pub id: String,
    /// Who acted.
    pub user: User,
    /// What they did ("created", "completed", ...).
    pub action: String,
    /// Name of the thing acted on.
    pub target: String,
    /// Kind of the thing acted on.
    pub target_type: TargetType,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

wire_enum! {
    /// Kind of entity an activity refers to.
    TargetType {
        Project => "project",
        Task => "task",
        User => "user",
    }
}

/// Aggregate counters for the projects overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    /// All projects.
    pub total_projects: u32,
    /// Projects in the Active stage.
    pub active_projects: u32,
    /// Projects in the Completed stage.
    pub completed_projects: u32,
    /// Active projects currently on schedule.
    pub on_track_projects: u32,
}

/// Aggregate counters for the tasks overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    /// All tasks.
    pub total_tasks: u32,
    /// Tasks in Done.
    pub completed_tasks: u32,
    /// Tasks in In Progress.
    pub in_progress_tasks: u32,
    /// Tasks in To Do.
    pub todo_tasks: u32,
    /// Tasks past their due date.
    pub overdue_tasks: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_labels_round_trip_through_fromstr() {
        assert_eq!("On Hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert_eq!("To Do".parse::<TaskStatus>().unwrap(), TaskStatus::ToDo);
        assert_eq!("QA".parse::<UserRole>().unwrap(), UserRole::Qa);
        assert_eq!(ProjectStatus::OnHold.to_string(), "On Hold");
        assert!("on hold".parse::<ProjectStatus>().is_err(), "labels are case-sensitive");
    }

    #[test]
    fn enums_serialize_as_their_display_strings() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"Critical\"");
    }

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let json = serde_json::json!({
            "id": "t1",
            "title": "Ship the board",
            "description": "Drag and drop",
            "status": "In Progress",
            "priority": "High",
            "assignee": {
                "id": "u1",
                "name": "Sarah Johnson",
                "email": "sarah@example.com",
                "avatar": "https://example.com/a.png",
                "role": "Admin",
                "status": "online",
                "department": "Engineering",
                "joinDate": "2023-01-15"
            },
            "projectId": "p1",
            "dueDate": "2026-09-01",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z",
            "estimatedHours": 8.0,
            "actualHours": 3.5,
            "tags": ["kanban"],
            "comments": []
        });

        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.project_id, "p1");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assignee.role, UserRole::Admin);
    }
}
