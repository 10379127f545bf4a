//! Task hooks: Kanban lists, stats, comments, polling, and the paged feed.

use std::time::Duration;

use leptos::*;
use reqwest::Method;

use crate::client::use_api_client;
use crate::models::{Comment, Priority, Task, TaskStats, TaskStatus};
use crate::options::{
    InfiniteQueryOptions, MutationOptions, OptimisticMutationOptions, PollingOptions,
    ResourceOptions,
};
use crate::use_infinite_query::{use_paged_resource, InfiniteQueryHandle};
use crate::use_mutation::{use_mutation, MutationHandle};
use crate::use_optimistic_mutation::{use_optimistic_mutation, OptimisticMutationHandle};
use crate::use_polling::{use_polling, PollingHandle};
use crate::use_resource::{use_api, use_resource, ResourceHandle};
use crate::validation::{CommentForm, TaskForm};

/// Refresh cadence for the Kanban board.
pub const TASK_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Filters for task lists. Only set fields become query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    /// Restrict to one Kanban column.
    pub status: Option<TaskStatus>,
    /// Restrict to one urgency.
    pub priority: Option<Priority>,
    /// Restrict to one project.
    pub project_id: Option<String>,
    /// Restrict to one assignee.
    pub assignee_id: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

impl TaskFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(project_id) = self.project_id.as_deref().filter(|p| !p.is_empty()) {
            params.push(("projectId", project_id.to_string()));
        }
        if let Some(assignee_id) = self.assignee_id.as_deref().filter(|a| !a.is_empty()) {
            params.push(("assigneeId", assignee_id.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// The filtered task list.
///
/// The filter closure is re-read on every fetch; call `refetch()` after
/// changing filters, or drive it from an effect.
pub fn use_tasks(filters: impl Fn() -> TaskFilters + 'static) -> ResourceHandle<Vec<Task>> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let params = filters().to_query();
            async move { client.get_json_with_params("tasks", &params).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch tasks")),
    )
}

/// A single task by id.
pub fn use_task(id: impl Fn() -> String + 'static) -> ResourceHandle<Task> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let id = id();
            async move { client.get_json(&format!("tasks/{id}")).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch task")),
    )
}

/// Create a task from a validated [`TaskForm`].
pub fn use_create_task() -> MutationHandle<TaskForm, Task> {
    let client = use_api_client();
    use_mutation(
        move |form: TaskForm| {
            let client = client.clone();
            async move {
                client
                    .send_json::<TaskForm, Task>(Method::POST, "tasks", Some(&form))
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to create task")),
    )
}

/// Update a task optimistically. Dragging a card to another column shows
/// the move immediately and snaps back if the server rejects it.
pub fn use_update_task() -> OptimisticMutationHandle<Task, Task> {
    let client = use_api_client();
    use_optimistic_mutation(
        move |task: Task| {
            let client = client.clone();
            async move {
                client
                    .send_json::<Task, Task>(
                        Method::PUT,
                        &format!("tasks/{}", task.id),
                        Some(&task),
                    )
                    .await
            }
        },
        OptimisticMutationOptions::default()
            .on_mutate(|task: &Task| task.clone())
            .on_rollback(|_previous: Option<&Task>| logging::log!("Rolling back task update"))
            .on_error(|error| error.log("Failed to update task")),
    )
}

/// Delete a task by id. The decoded payload is always `None`.
pub fn use_delete_task() -> MutationHandle<String, Task> {
    let client = use_api_client();
    use_mutation(
        move |id: String| {
            let client = client.clone();
            async move {
                client
                    .send_json::<(), Task>(Method::DELETE, &format!("tasks/{id}"), None)
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to delete task")),
    )
}

/// Aggregate counters for the overview cards.
pub fn use_task_stats() -> ResourceHandle<TaskStats> {
    use_api(
        "tasks/stats",
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch task stats")),
    )
}

/// The comment thread of one task.
pub fn use_task_comments(
    task_id: impl Fn() -> String + 'static,
) -> ResourceHandle<Vec<Comment>> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let task_id = task_id();
            async move { client.get_json(&format!("tasks/{task_id}/comments")).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch comments")),
    )
}

/// Append a comment to a task.
pub fn use_add_task_comment(
    task_id: impl Fn() -> String + 'static,
) -> MutationHandle<CommentForm, Comment> {
    let client = use_api_client();
    use_mutation(
        move |form: CommentForm| {
            let client = client.clone();
            let task_id = task_id();
            async move {
                client
                    .send_json::<CommentForm, Comment>(
                        Method::POST,
                        &format!("tasks/{task_id}/comments"),
                        Some(&form),
                    )
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to add comment")),
    )
}

/// The filtered task list on a 30-second poll, for the live Kanban board.
///
/// Filters are read once; remount the hook to change them.
pub fn use_task_polling(filters: TaskFilters) -> PollingHandle<Vec<Task>> {
    let client = use_api_client();
    use_polling(
        move || {
            let client = client.clone();
            let params = filters.to_query();
            async move { client.get_json_with_params("tasks", &params).await }
        },
        TASK_POLL_INTERVAL,
        PollingOptions::default()
            .set_resource(
                ResourceOptions::default().on_error(|error| error.log("Failed to poll tasks")),
            ),
    )
}

/// The task feed as a cursor-paginated infinite list.
pub fn use_task_feed(filters: TaskFilters, limit: u32) -> InfiniteQueryHandle<Task> {
    let client = use_api_client();
    use_paged_resource(
        move |cursor: String, limit: u32| {
            let client = client.clone();
            let mut params = filters.to_query();
            params.push(("limit", limit.to_string()));
            params.push(("cursor", cursor));
            async move { client.get_json_with_params::<Vec<Task>>("tasks", &params).await }
        },
        InfiniteQueryOptions::default().set_limit(limit),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_emit_only_set_fields() {
        assert!(TaskFilters::default().to_query().is_empty());

        let filtered = TaskFilters {
            status: Some(TaskStatus::InProgress),
            project_id: Some("p7".into()),
            assignee_id: Some("u3".into()),
            ..TaskFilters::default()
        };
        assert_eq!(
            filtered.to_query(),
            vec![
                ("status", "In Progress".to_string()),
                ("projectId", "p7".to_string()),
                ("assigneeId", "u3".to_string()),
            ]
        );
    }
}
