use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use futures_channel::oneshot;
use leptos::*;
use serde::de::DeserializeOwned;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::options::ResourceOptions;
use crate::request_state::RequestState;
use crate::retry::with_retry;
use crate::util::race_with_cancellation;

type ResourceFetcher<T> = Rc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<T, AppError>>>>>;

/// Declarative single-resource fetch with loading/error state, cancellation,
/// and automatic retry.
///
/// The fetcher is injected, so anything async that yields a
/// `Result<T, AppError>` can back a resource; [`use_api()`] wires it to the
/// shared [`ApiClient`](crate::ApiClient) for plain GETs.
///
/// At most one logical request is in flight per hook instance: `refetch()`
/// supersedes the previous request, whose late result is discarded.
///
/// ```
/// use leptos::*;
/// use projectflow_query::*;
///
/// #[derive(Clone, Debug, serde::Deserialize)]
/// struct Weather { temperature: f32 }
///
/// async fn load_weather() -> Result<Weather, AppError> {
///     todo!()
/// }
///
/// fn use_weather() -> ResourceHandle<Weather> {
///     use_resource(load_weather, ResourceOptions::default())
/// }
/// ```
pub fn use_resource<T, Fu>(
    fetcher: impl Fn() -> Fu + 'static,
    options: ResourceOptions<T>,
) -> ResourceHandle<T>
where
    T: Clone + 'static,
    Fu: Future<Output = Result<T, AppError>> + 'static,
{
    let state = RwSignal::new(RequestState::idle());
    let fetcher: ResourceFetcher<T> =
        Rc::new(move || Box::pin(fetcher()) as Pin<Box<dyn Future<Output = Result<T, AppError>>>>);

    let handle = ResourceHandle {
        data: Signal::derive(move || state.with(|s| s.data.clone())),
        loading: Signal::derive(move || state.with(|s| s.loading)),
        error: Signal::derive(move || state.with(|s| s.error.clone())),
        state,
        fetcher,
        current_request: Rc::new(Cell::new(None)),
        options: Rc::new(options),
    };

    // Unmount cancels whatever is still in flight.
    {
        let current_request = handle.current_request.clone();
        on_cleanup(move || {
            if let Some(request) = current_request.take() {
                let _ = request.send(());
            }
        });
    }

    if handle.options.immediate {
        let handle = handle.clone();
        create_effect(move |_| handle.refetch());
    }

    handle
}

/// A resource backed by a GET against the configured API root.
///
/// Requires an [`ApiClient`](crate::ApiClient) in context; see
/// [`provide_api_client()`](crate::provide_api_client()).
pub fn use_api<T>(path: impl Into<String>, options: ResourceOptions<T>) -> ResourceHandle<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let client = use_api_client();
    let path = path.into();
    use_resource(
        move || {
            let client = client.clone();
            let path = path.clone();
            async move { client.get_json::<T>(&path).await }
        },
        options,
    )
}

/// Reactive handle returned by [`use_resource()`]/[`use_api()`].
#[derive(Clone)]
pub struct ResourceHandle<T: 'static> {
    /// The fetched value. `None` until the first successful fetch.
    pub data: Signal<Option<T>>,
    /// A request is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent cycle.
    pub error: Signal<Option<AppError>>,

    state: RwSignal<RequestState<T>>,
    fetcher: ResourceFetcher<T>,
    current_request: Rc<Cell<Option<oneshot::Sender<()>>>>,
    options: Rc<ResourceOptions<T>>,
}

impl<T> ResourceHandle<T>
where
    T: Clone + 'static,
{
    /// Start a fetch, superseding any in-flight request.
    pub fn refetch(&self) {
        let this = self.clone();
        spawn_local(async move { this.execute().await });
    }

    /// Run one fetch cycle to completion.
    ///
    /// Same semantics as [`refetch()`](Self::refetch), exposed separately for
    /// callers that need to await the outcome.
    pub async fn execute(&self) {
        let cancellation = self.supersede();
        self.state.update(|s| s.begin());

        let fetcher = self.fetcher.clone();
        let options = self.options.clone();
        let fetch = std::pin::pin!(with_retry(
            move || fetcher(),
            options.retry_count,
            options.retry_delay,
        ));

        match race_with_cancellation(fetch, cancellation).await {
            Ok(Ok(data)) => {
                self.state.update(|s| s.succeed(data.clone()));
                if let Some(on_success) = options.on_success.as_ref() {
                    on_success(&data);
                }
                self.current_request.set(None);
            }
            Ok(Err(error)) => {
                self.state.update(|s| s.fail(error.clone()));
                if let Some(on_error) = options.on_error.as_ref() {
                    on_error(&error);
                }
                self.current_request.set(None);
            }
            // Superseded or torn down; the newer request owns the state now.
            Err(()) => {}
        }
    }

    /// Abort any in-flight request and return to Idle with cleared
    /// data/error.
    pub fn reset(&self) {
        if let Some(request) = self.current_request.take() {
            let _ = request.send(());
        }
        self.state.set(RequestState::idle());
    }

    // Cancel the previous request and register a fresh cancellation channel.
    fn supersede(&self) -> oneshot::Receiver<()> {
        if let Some(previous) = self.current_request.take() {
            let _ = previous.send(());
        }
        let (sender, receiver) = oneshot::channel();
        self.current_request.set(Some(sender));
        receiver
    }
}
