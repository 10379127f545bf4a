use std::future::Future;
use std::rc::Rc;

use leptos::*;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::options::OptimisticMutationOptions;
use crate::request_state::RequestState;
use crate::retry::with_retry;
use crate::use_mutation::MutationAction;

/// A mutation that speculatively applies a locally-computed value before the
/// network call settles, and restores the prior value on failure.
///
/// `on_mutate` computes the optimistic value. The previous data is captured
/// before the optimistic write and is the only value ever restored on
/// rollback, so the caller-visible data never reflects a lost or partially
/// applied write.
pub fn use_optimistic_mutation<V, T, Fu>(
    action: impl Fn(V) -> Fu + 'static,
    options: OptimisticMutationOptions<V, T>,
) -> OptimisticMutationHandle<V, T>
where
    V: Clone + 'static,
    T: Clone + 'static,
    Fu: Future<Output = Result<Option<T>, AppError>> + 'static,
{
    let state = RwSignal::new(RequestState::idle());
    let action: MutationAction<V, T> = Rc::new(move |variables| {
        Box::pin(action(variables))
            as std::pin::Pin<Box<dyn Future<Output = Result<Option<T>, AppError>>>>
    });

    OptimisticMutationHandle {
        data: Signal::derive(move || state.with(|s| s.data.clone())),
        loading: Signal::derive(move || state.with(|s| s.loading)),
        error: Signal::derive(move || state.with(|s| s.error.clone())),
        state,
        action,
        options: Rc::new(options),
    }
}

/// An optimistic mutation whose variables are serialized as the JSON request
/// body and sent with `method` to `path` under the configured API root.
pub fn use_optimistic_api_mutation<V, T>(
    method: Method,
    path: impl Into<String>,
    options: OptimisticMutationOptions<V, T>,
) -> OptimisticMutationHandle<V, T>
where
    V: Serialize + Clone + 'static,
    T: DeserializeOwned + Clone + 'static,
{
    let client = use_api_client();
    let path = path.into();
    use_optimistic_mutation(
        move |variables: V| {
            let client = client.clone();
            let method = method.clone();
            let path = path.clone();
            async move { client.send_json::<V, T>(method, &path, Some(&variables)).await }
        },
        options,
    )
}

/// Reactive handle returned by [`use_optimistic_mutation()`].
#[derive(Clone)]
pub struct OptimisticMutationHandle<V: 'static, T: 'static> {
    /// Current value: the optimistic value while the call runs, the server
    /// payload after success, the captured previous value after a rollback.
    pub data: Signal<Option<T>>,
    /// A call is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent call.
    pub error: Signal<Option<AppError>>,

    state: RwSignal<RequestState<T>>,
    action: MutationAction<V, T>,
    options: Rc<OptimisticMutationOptions<V, T>>,
}

impl<V, T> OptimisticMutationHandle<V, T>
where
    V: Clone + 'static,
    T: Clone + 'static,
{
    /// Issue the write, applying the optimistic value first.
    ///
    /// Sequence: capture the previous data; write `on_mutate(&variables)` to
    /// state (when provided) and enter Loading; run the retried request. On
    /// success the server payload supersedes the optimistic value. On failure
    /// `on_rollback` fires with the captured value, data is restored to
    /// exactly that value, the error is stored and re-thrown.
    ///
    /// A call while another one is pending is rejected immediately with an
    /// [`Unknown`](crate::ErrorKind::Unknown)-kind error, keeping the
    /// previous-value capture sound.
    pub async fn mutate(&self, variables: V) -> Result<Option<T>, AppError> {
        if self.state.with_untracked(|s| s.loading) {
            return Err(AppError::unknown("mutation already in flight"));
        }

        let options = self.options.clone();
        let previous = self.state.with_untracked(|s| s.data.clone());

        match options.on_mutate.as_ref() {
            Some(make_optimistic) => {
                let optimistic = make_optimistic(&variables);
                self.state.update(|s| {
                    s.begin();
                    s.data = Some(optimistic);
                });
            }
            None => self.state.update(|s| s.begin()),
        }

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
                if let Some(on_rollback) = options.on_rollback.as_ref() {
                    on_rollback(previous.as_ref());
                }
                self.state.update(|s| {
                    s.data = previous;
                    s.fail(error.clone());
                });
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
    use std::cell::RefCell;

    fn seed<T: Clone + 'static>(handle: &OptimisticMutationHandle<String, T>, value: T) {
        handle.state.update(|s| s.succeed(value));
    }

    // An action that stays pending until the test releases it, so the
    // in-flight state can be observed.
    fn gated_action(
        release: futures_channel::oneshot::Receiver<()>,
    ) -> impl Fn(String) -> std::pin::Pin<Box<dyn Future<Output = Result<Option<String>, AppError>>>>
    {
        let release = RefCell::new(Some(release));
        move |name: String| {
            let release = release.borrow_mut().take();
            Box::pin(async move {
                if let Some(release) = release {
                    let _ = release.await;
                }
                Ok(Some(name))
            })
        }
    }

    #[tokio::test]
    async fn optimistic_value_is_visible_while_loading() {
        let _ = create_runtime();
        let (release, gate) = futures_channel::oneshot::channel();
        let handle = use_optimistic_mutation(
            gated_action(gate),
            OptimisticMutationOptions::default()
                .set_retry_count(0)
                .on_mutate(|name: &String| format!("{name}!")),
        );
        seed(&handle, "before".to_string());

        let mutation = handle.mutate("after".to_string());
        futures::pin_mut!(mutation);
        assert!(futures::poll!(mutation.as_mut()).is_pending());

        assert_eq!(
            handle.data.get_untracked(),
            Some("after!".to_string()),
            "the optimistic value must be applied before the request settles"
        );
        assert!(handle.loading.get_untracked());

        release.send(()).expect("action is waiting on the gate");
        let result = mutation.await;
        assert_eq!(result.unwrap(), Some("after".to_string()));
        assert_eq!(
            handle.data.get_untracked(),
            Some("after".to_string()),
            "the server payload supersedes the optimistic value"
        );
    }

    #[tokio::test]
    async fn failure_restores_exactly_the_previous_value() {
        let _ = create_runtime();
        let rolled_back = Rc::new(RefCell::new(None));
        let handle = use_optimistic_mutation(
            |_name: String| async move {
                Err::<Option<String>, _>(AppError::server("boom", 500))
            },
            OptimisticMutationOptions::default()
                .set_retry_count(0)
                .on_mutate(|name: &String| name.clone())
                .on_rollback({
                    let rolled_back = rolled_back.clone();
                    move |previous: Option<&String>| {
                        *rolled_back.borrow_mut() = previous.cloned();
                    }
                }),
        );
        seed(&handle, "X".to_string());

        let result = handle.mutate("Y".to_string()).await;

        assert!(result.is_err());
        assert_eq!(
            handle.data.get_untracked(),
            Some("X".to_string()),
            "failure must restore the pre-mutation value, never the optimistic one"
        );
        assert_eq!(*rolled_back.borrow(), Some("X".to_string()));
        assert!(handle.error.get_untracked().is_some());
        assert!(!handle.loading.get_untracked());
    }

    #[tokio::test]
    async fn without_on_mutate_only_loading_flips() {
        let _ = create_runtime();
        let (release, gate) = futures_channel::oneshot::channel();
        let handle = use_optimistic_mutation(
            gated_action(gate),
            OptimisticMutationOptions::default().set_retry_count(0),
        );
        seed(&handle, "kept".to_string());

        let mutation = handle.mutate("server".to_string());
        futures::pin_mut!(mutation);
        assert!(futures::poll!(mutation.as_mut()).is_pending());

        assert_eq!(handle.data.get_untracked(), Some("kept".to_string()));
        assert!(handle.loading.get_untracked());

        release.send(()).expect("action is waiting on the gate");
        let _ = mutation.await;
        assert_eq!(handle.data.get_untracked(), Some("server".to_string()));
    }
}
