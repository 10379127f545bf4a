#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ProjectFlow Query
//!
//! Reactive data-access layer for the ProjectFlow dashboard, built on
//! [Leptos](https://github.com/leptos-rs/leptos).
//!
//! The hooks wrap a JSON API behind loading/error/data signals:
//!
//! - single-resource fetching with cancellation and automatic retry
//! - mutations, plain and optimistic (with rollback)
//! - interval polling
//! - cursor-paginated infinite queries
//! - a typed error taxonomy shared by everything above
//! - declarative form validation with field-level error maps
//!
//! Every hook instance owns its own state; there is no cross-instance cache
//! or request de-duplication. Two components mounting the same resource
//! fetch it twice. A shared cache, if ever needed, belongs in an explicit
//! layer above these hooks.
//!
//! # Feature Flags
//! - `csr` Client-side rendering: browser timers and wasm clocks.
//! - `hydrate` Hydration: same browser bindings for hydrated apps.
//! - `ssr` Server-side rendering: tokio-backed timers.
//! - `local_storage` Enables the local-storage persister.
//!
//! # A Simple Example
//!
//! Provide the HTTP client once near the root of the app, then use hooks in
//! any component below it.
//!
//! ```no_run
//! use leptos::*;
//! use projectflow_query::*;
//!
//! #[component]
//! pub fn App() -> impl IntoView {
//!     // Provides the API client for the entire app.
//!     provide_api_client();
//!
//!     // Rest of App...
//! }
//!
//! #[component]
//! fn ProjectList() -> impl IntoView {
//!     let projects = use_projects(ProjectFilters::default);
//!
//!     move || {
//!         projects
//!             .data
//!             .get()
//!             .map(|projects| projects.len().to_string())
//!             .unwrap_or_else(|| "Loading...".to_string())
//!     }
//! }
//! ```

mod client;
mod config;
mod error;
mod instant;
mod models;
mod options;
/// Client-side persistence port for theme and draft state.
pub mod persist;
mod projects;
mod request_state;
mod retry;
mod tasks;
mod team;
mod use_infinite_query;
mod use_mutation;
mod use_optimistic_mutation;
mod use_polling;
mod use_resource;
mod util;
mod validation;

pub use client::*;
pub use config::*;
pub use error::*;
pub use instant::*;
pub use models::*;
pub use options::*;
pub use projects::*;
pub use request_state::*;
pub use retry::*;
pub use tasks::*;
pub use team::*;
pub use use_infinite_query::*;
pub use use_mutation::*;
pub use use_optimistic_mutation::*;
pub use use_polling::*;
pub use use_resource::*;
pub use util::use_debounced;
pub use validation::*;
