use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use leptos::*;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::options::MutationOptions;
use crate::request_state::RequestState;
use crate::retry::with_retry;

pub(crate) type MutationAction<V, T> =
    Rc<dyn Fn(V) -> Pin<Box<dyn Future<Output = Result<Option<T>, AppError>>>>>;

/// A single write (POST/PUT/PATCH/DELETE) with retry, independent of any
/// fetched resource state.
///
/// The action is injected; [`use_api_mutation()`] wires it to the shared
/// [`ApiClient`](crate::ApiClient). The decoded payload is `Option<T>`
/// because DELETE responses carry no body.
pub fn use_mutation<V, T, Fu>(
    action: impl Fn(V) -> Fu + 'static,
    options: MutationOptions<V, T>,
) -> MutationHandle<V, T>
where
    V: Clone + 'static,
    T: Clone + 'static,
    Fu: Future<Output = Result<Option<T>, AppError>> + 'static,
{
    let state = RwSignal::new(RequestState::idle());
    let action: MutationAction<V, T> = Rc::new(move |variables| {
        Box::pin(action(variables)) as Pin<Box<dyn Future<Output = Result<Option<T>, AppError>>>>
    });

    MutationHandle {
        data: Signal::derive(move || state.with(|s| s.data.clone())),
        loading: Signal::derive(move || state.with(|s| s.loading)),
        error: Signal::derive(move || state.with(|s| s.error.clone())),
        state,
        action,
        options: Rc::new(options),
    }
}

/// A mutation whose variables are serialized as the JSON request body and
/// sent with `method` to `path` under the configured API root.
pub fn use_api_mutation<V, T>(
    method: Method,
    path: impl Into<String>,
    options: MutationOptions<V, T>,
) -> MutationHandle<V, T>
where
    V: Serialize + Clone + 'static,
    T: DeserializeOwned + Clone + 'static,
{
    let client = use_api_client();
    let path = path.into();
    use_mutation(
        move |variables: V| {
            let client = client.clone();
            let method = method.clone();
            let path = path.clone();
            async move { client.send_json::<V, T>(method, &path, Some(&variables)).await }
        },
        options,
    )
}

/// Reactive handle returned by [`use_mutation()`]/[`use_api_mutation()`].
#[derive(Clone)]
pub struct MutationHandle<V: 'static, T: 'static> {
    /// Payload of the last successful call. `None` before the first success
    /// and after DELETE.
    pub data: Signal<Option<T>>,
    /// A call is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent call.
    pub error: Signal<Option<AppError>>,

    state: RwSignal<RequestState<T>>,
    action: MutationAction<V, T>,
    options: Rc<MutationOptions<V, T>>,
}

impl<V, T> MutationHandle<V, T>
where
    V: Clone + 'static,
    T: Clone + 'static,
{
    /// Issue the write and await its outcome.
    ///
    /// Fires `on_mutate` synchronously, retries through the retry executor,
    /// stores the outcome in state, invokes `on_success`/`on_error`, and
    /// re-throws the error so an awaiting caller can react (e.g. keep a
    /// dialog open).
    ///
    /// A call while another one is pending is rejected immediately with an
    /// [`Unknown`](crate::ErrorKind::Unknown)-kind error; state and callbacks
    /// are untouched. Callers serialize their own rapid-fire submissions.
    pub async fn mutate(&self, variables: V) -> Result<Option<T>, AppError> {
        if self.state.with_untracked(|s| s.loading) {
            return Err(AppError::unknown("mutation already in flight"));
        }

        let options = self.options.clone();
        if let Some(on_mutate) = options.on_mutate.as_ref() {
            on_mutate(&variables);
        }
        self.state.update(|s| s.begin());

        let action = self.action.clone();
        let result = with_retry(
            move || action(variables.clone()),
            options.retry_count,
            options.retry_delay,
        )
        .await;

        match result {
            Ok(data) => {
                self.state.update(|s| s.finish(data.clone()));
                if let Some(on_success) = options.on_success.as_ref() {
                    on_success(data.as_ref());
                }
                Ok(data)
            }
            Err(error) => {
                self.state.update(|s| s.fail(error.clone()));
                if let Some(on_error) = options.on_error.as_ref() {
                    on_error(&error);
                }
                Err(error)
            }
        }
    }

    /// Fire-and-forget variant of [`mutate()`](Self::mutate) for UI event
    /// handlers; the outcome lands in state and callbacks.
    pub fn dispatch(&self, variables: V) {
        let this = self.clone();
        spawn_local(async move {
            let _ = this.mutate(variables).await;
        });
    }

    /// Clear data/loading/error.
    pub fn reset(&self) {
        self.state.set(RequestState::idle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::{Cell, RefCell};

    #[tokio::test]
    async fn success_stores_payload_and_fires_callbacks() {
        let _ = create_runtime();
        let order = Rc::new(RefCell::new(Vec::new()));
        let options = MutationOptions::default()
            .on_mutate({
                let order = order.clone();
                move |variables: &u32| order.borrow_mut().push(format!("mutate:{variables}"))
            })
            .on_success({
                let order = order.clone();
                move |data: Option<&String>| {
                    order.borrow_mut().push(format!("success:{}", data.unwrap()))
                }
            });
        let handle = use_mutation(
            |variables: u32| async move { Ok(Some(format!("saved-{variables}"))) },
            options,
        );

        let result = handle.mutate(9).await;

        assert_eq!(result.unwrap(), Some("saved-9".to_string()));
        assert_eq!(handle.data.get_untracked(), Some("saved-9".to_string()));
        assert_eq!(
            *order.borrow(),
            vec!["mutate:9".to_string(), "success:saved-9".to_string()],
            "on_mutate fires before the request, on_success after"
        );
    }

    #[tokio::test]
    async fn failure_is_stored_and_rethrown() {
        let _ = create_runtime();
        let handle = use_mutation(
            |_variables: u32| async move {
                Err::<Option<String>, _>(AppError::from_status(403, "Forbidden"))
            },
            MutationOptions::default().set_retry_count(0),
        );

        let result = handle.mutate(1).await;

        let error = result.expect_err("mutation errors must reach the caller");
        assert_eq!(error.kind, ErrorKind::Authorization);
        assert_eq!(
            handle.error.get_untracked().map(|e| e.kind),
            Some(ErrorKind::Authorization)
        );
        assert!(!handle.loading.get_untracked());
    }

    #[tokio::test]
    async fn retries_before_giving_up() {
        let _ = create_runtime();
        let calls = Rc::new(Cell::new(0u32));
        let handle = use_mutation(
            {
                let calls = calls.clone();
                move |_variables: ()| {
                    let calls = calls.clone();
                    async move {
                        calls.set(calls.get() + 1);
                        Err::<Option<u32>, _>(AppError::network("offline"))
                    }
                }
            },
            MutationOptions::default().set_retry_count(1),
        );

        let _ = handle.mutate(()).await;

        assert_eq!(calls.get(), 2, "1 retry means 2 attempts");
    }

    #[tokio::test]
    async fn a_second_call_while_pending_is_rejected() {
        let _ = create_runtime();
        let handle = use_mutation(
            |_variables: ()| async move {
                futures::future::pending::<()>().await;
                unreachable!()
            },
            MutationOptions::<(), u32>::default(),
        );

        let pending = handle.mutate(());
        futures::pin_mut!(pending);
        // Drive the first call far enough to mark the state as loading.
        assert!(futures::poll!(pending.as_mut()).is_pending());

        let second = handle.mutate(()).await;
        let error = second.expect_err("overlapping mutate must be rejected");
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert!(
            handle.error.get_untracked().is_none(),
            "rejection must not disturb the in-flight call's state"
        );
    }
}
