//! Project hooks: lists, single resources, stats, and write operations.

use std::time::Duration;

use leptos::*;
use reqwest::Method;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::models::{Activity, Priority, Project, ProjectStats, ProjectStatus};
use crate::options::{MutationOptions, OptimisticMutationOptions, ResourceOptions};
use crate::use_mutation::{use_mutation, MutationHandle};
use crate::use_optimistic_mutation::{use_optimistic_mutation, OptimisticMutationHandle};
use crate::use_resource::{use_api, use_resource, ResourceHandle};
use crate::util::use_debounced;
use crate::validation::ProjectForm;

/// Filters for the project list. Only set fields become query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilters {
    /// Restrict to one lifecycle stage.
    pub status: Option<ProjectStatus>,
    /// Restrict to one urgency.
    pub priority: Option<Priority>,
    /// Free-text search.
    pub search: Option<String>,
}

impl ProjectFilters {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}

/// The filtered project list.
///
/// The filter closure is re-read on every fetch; call `refetch()` after
/// changing filters, or drive it from an effect.
pub fn use_projects(
    filters: impl Fn() -> ProjectFilters + 'static,
) -> ResourceHandle<Vec<Project>> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let params = filters().to_query();
            async move { client.get_json_with_params("projects", &params).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch projects")),
    )
}

/// A single project by id.
pub fn use_project(id: impl Fn() -> String + 'static) -> ResourceHandle<Project> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let id = id();
            async move { client.get_json(&format!("projects/{id}")).await }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch project")),
    )
}

/// Create a project from a validated [`ProjectForm`].
pub fn use_create_project() -> MutationHandle<ProjectForm, Project> {
    let client = use_api_client();
    use_mutation(
        move |form: ProjectForm| {
            let client = client.clone();
            async move {
                client
                    .send_json::<ProjectForm, Project>(Method::POST, "projects", Some(&form))
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to create project")),
    )
}

/// Update a project optimistically: the submitted value shows immediately
/// and is rolled back if the server rejects it.
pub fn use_update_project() -> OptimisticMutationHandle<Project, Project> {
    let client = use_api_client();
    use_optimistic_mutation(
        move |project: Project| {
            let client = client.clone();
            async move {
                client
                    .send_json::<Project, Project>(
                        Method::PUT,
                        &format!("projects/{}", project.id),
                        Some(&project),
                    )
                    .await
            }
        },
        OptimisticMutationOptions::default()
            .on_mutate(|project: &Project| project.clone())
            .on_rollback(|_previous: Option<&Project>| {
                logging::log!("Rolling back project update")
            })
            .on_error(|error| error.log("Failed to update project")),
    )
}

/// Delete a project by id. The decoded payload is always `None`.
pub fn use_delete_project() -> MutationHandle<String, Project> {
    let client = use_api_client();
    use_mutation(
        move |id: String| {
            let client = client.clone();
            async move {
                client
                    .send_json::<(), Project>(Method::DELETE, &format!("projects/{id}"), None)
                    .await
            }
        },
        MutationOptions::default().on_error(|error| error.log("Failed to delete project")),
    )
}

/// Aggregate counters for the overview cards.
pub fn use_project_stats() -> ResourceHandle<ProjectStats> {
    use_api(
        "projects/stats",
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch project stats")),
    )
}

/// The activity feed of one project.
pub fn use_project_activities(
    project_id: impl Fn() -> String + 'static,
) -> ResourceHandle<Vec<Activity>> {
    let client = use_api_client();
    use_resource(
        move || {
            let client = client.clone();
            let project_id = project_id();
            async move {
                client
                    .get_json(&format!("projects/{project_id}/activities"))
                    .await
            }
        },
        ResourceOptions::default().on_error(|error| error.log("Failed to fetch activities")),
    )
}

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Reactive handle returned by [`use_project_search()`].
#[derive(Clone)]
pub struct ProjectSearch {
    /// Matching projects, empty until the first fetch.
    pub projects: Signal<Vec<Project>>,
    /// A search request is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent search.
    pub error: Signal<Option<AppError>>,
    /// The live search input; write here from the search box.
    pub term: RwSignal<String>,
    resource: ResourceHandle<Vec<Project>>,
}

impl ProjectSearch {
    /// Set the search term.
    pub fn search(&self, term: impl Into<String>) {
        self.term.set(term.into());
    }

    /// Clear the term; the next debounced fetch returns everything.
    pub fn clear(&self) {
        self.term.set(String::new());
    }

    /// Re-run the current search immediately.
    pub fn refetch(&self) {
        self.resource.refetch();
    }
}

/// Project search with a 300 ms debounce between keystrokes and requests.
pub fn use_project_search() -> ProjectSearch {
    let client = use_api_client();
    let term = RwSignal::new(String::new());
    let debounced = use_debounced(term.into(), SEARCH_DEBOUNCE);

    let resource = use_resource(
        move || {
            let client = client.clone();
            let filters = ProjectFilters {
                search: Some(debounced.get_untracked()).filter(|s| !s.is_empty()),
                ..ProjectFilters::default()
            };
            async move {
                client
                    .get_json_with_params("projects", &filters.to_query())
                    .await
            }
        },
        ResourceOptions::default()
            .set_immediate(false)
            .on_error(|error| error.log("Failed to search projects")),
    );

    // Every settled term change triggers a fresh (superseding) fetch.
    {
        let resource = resource.clone();
        create_effect(move |_| {
            debounced.track();
            resource.refetch();
        });
    }

    let data = resource.data;
    ProjectSearch {
        projects: Signal::derive(move || data.get().unwrap_or_default()),
        loading: resource.loading,
        error: resource.error,
        term,
        resource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_emit_only_set_fields() {
        let all = ProjectFilters::default();
        assert!(all.to_query().is_empty(), "defaults add no query parameters");

        let filtered = ProjectFilters {
            status: Some(ProjectStatus::Active),
            priority: Some(Priority::High),
            search: Some("web".into()),
        };
        assert_eq!(
            filtered.to_query(),
            vec![
                ("status", "Active".to_string()),
                ("priority", "High".to_string()),
                ("search", "web".to_string()),
            ]
        );
    }

    #[test]
    fn an_empty_search_string_is_dropped() {
        let filters = ProjectFilters {
            search: Some(String::new()),
            ..ProjectFilters::default()
        };
        assert!(filters.to_query().is_empty());
    }
}
