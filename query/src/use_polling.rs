use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use leptos::leptos_dom::helpers::{set_interval_with_handle, IntervalHandle};
use leptos::*;
use serde::de::DeserializeOwned;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::options::PollingOptions;
use crate::use_resource::{use_resource, ResourceHandle};

/// Repeated resource fetch on a fixed wall-clock interval.
///
/// Built on [`use_resource()`]: the interval timer re-runs `refetch` while
/// polling is enabled AND the underlying fetch is not currently loading, so
/// slow responses never pile up overlapping requests. The timer is cleared
/// whenever polling stops and on cleanup.
pub fn use_polling<T, Fu>(
    fetcher: impl Fn() -> Fu + 'static,
    interval: Duration,
    options: PollingOptions<T>,
) -> PollingHandle<T>
where
    T: Clone + 'static,
    Fu: Future<Output = Result<T, AppError>> + 'static,
{
    let initially_enabled = options.enabled;
    let resource = use_resource(fetcher, options.resource.set_immediate(false));
    let enabled = RwSignal::new(initially_enabled);
    let interval_handle: Rc<Cell<Option<IntervalHandle>>> = Rc::new(Cell::new(None));

    // Arm the timer only while enabled and not mid-fetch. The effect re-runs
    // when either input flips, replacing the previous timer.
    {
        let resource = resource.clone();
        let interval_handle = interval_handle.clone();
        create_effect(move |_| {
            let armed = enabled.get() && !resource.loading.get();
            if let Some(handle) = interval_handle.take() {
                handle.clear();
            }
            if armed {
                let resource = resource.clone();
                let handle =
                    set_interval_with_handle(move || resource.refetch(), interval).ok();
                interval_handle.set(handle);
            }
        });
    }

    {
        let interval_handle = interval_handle.clone();
        on_cleanup(move || {
            if let Some(handle) = interval_handle.take() {
                handle.clear();
            }
        });
    }

    // First poll fires immediately when enabled.
    if initially_enabled {
        let resource = resource.clone();
        create_effect(move |_| resource.refetch());
    }

    PollingHandle {
        data: resource.data,
        loading: resource.loading,
        error: resource.error,
        resource,
        enabled,
        interval_handle,
    }
}

/// Polling backed by a GET against the configured API root.
pub fn use_api_polling<T>(
    path: impl Into<String>,
    interval: Duration,
    options: PollingOptions<T>,
) -> PollingHandle<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let client = use_api_client();
    let path = path.into();
    use_polling(
        move || {
            let client = client.clone();
            let path = path.clone();
            async move { client.get_json::<T>(&path).await }
        },
        interval,
        options,
    )
}

/// Reactive handle returned by [`use_polling()`]/[`use_api_polling()`].
#[derive(Clone)]
pub struct PollingHandle<T: 'static> {
    /// The fetched value. `None` until the first successful poll.
    pub data: Signal<Option<T>>,
    /// A request is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent cycle.
    pub error: Signal<Option<AppError>>,

    resource: ResourceHandle<T>,
    enabled: RwSignal<bool>,
    interval_handle: Rc<Cell<Option<IntervalHandle>>>,
}

impl<T> PollingHandle<T>
where
    T: Clone + 'static,
{
    /// Resume polling.
    pub fn start_polling(&self) {
        self.enabled.set(true);
    }

    /// Stop polling and clear the interval timer.
    pub fn stop_polling(&self) {
        if let Some(handle) = self.interval_handle.take() {
            handle.clear();
        }
        self.enabled.set(false);
    }

    /// Whether polling is currently enabled.
    pub fn is_polling(&self) -> bool {
        self.enabled.get_untracked()
    }

    /// Fetch once, outside the interval cadence.
    pub fn refetch(&self) {
        self.resource.refetch();
    }

    /// Abort and return the underlying resource to Idle. Polling stays in
    /// whatever enabled state it had.
    pub fn reset(&self) {
        self.resource.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_and_stop_toggle_the_enabled_flag() {
        let _ = create_runtime();
        let handle = use_polling(
            || async { Ok(0u32) },
            Duration::from_secs(30),
            PollingOptions::default().set_enabled(false),
        );

        assert!(!handle.is_polling());
        handle.start_polling();
        assert!(handle.is_polling());
        handle.stop_polling();
        assert!(!handle.is_polling());
    }

    #[tokio::test]
    async fn stop_polling_clears_a_live_timer() {
        let _ = create_runtime();
        let handle = use_polling(
            || async { Ok(0u32) },
            Duration::from_secs(30),
            PollingOptions::default().set_enabled(false),
        );

        // No timer could be armed outside the browser; the cell must be
        // empty either way after stopping.
        handle.stop_polling();
        assert!(handle.interval_handle.take().is_none());
    }
}
