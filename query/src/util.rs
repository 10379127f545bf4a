use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures_channel::oneshot;
use leptos::{leptos_dom::helpers::TimeoutHandle, *};

/// Suspend the current task without blocking the thread.
///
/// Uses the browser timer on `csr`/`hydrate` and tokio on `ssr`.
pub(crate) async fn sleep(duration: Duration) {
    cfg_if::cfg_if! {
        if #[cfg(feature = "ssr")] {
            tokio::time::sleep(duration).await;
        } else if #[cfg(any(feature = "hydrate", feature = "csr"))] {
            gloo_timers::future::sleep(duration).await;
        } else {
            let _ = duration;
            logging::debug_warn!("projectflow_query: no timer feature enabled (csr, hydrate, or ssr); skipping delay.");
        }
    }
}

/// Await `fut` unless the cancellation channel fires first.
///
/// `Err(())` means the request was superseded or torn down; the caller must
/// leave state untouched and fire no callbacks.
pub(crate) async fn race_with_cancellation<T, Fu>(
    fut: Fu,
    cancellation: oneshot::Receiver<()>,
) -> Result<T, ()>
where
    Fu: std::future::Future<Output = T> + Unpin,
{
    use futures::future::Either;

    match futures::future::select(fut, cancellation).await {
        Either::Left((value, _)) => Ok(value),
        Either::Right((cancelled, _)) => {
            if cancelled.is_err() {
                logging::debug_warn!("Request cancellation handle dropped without firing.");
            }
            Err(())
        }
    }
}

/// Mirror `source` into the returned signal once it has been quiet for
/// `delay`. Pending timers are replaced on every change and cleared on
/// cleanup.
pub fn use_debounced(source: Signal<String>, delay: Duration) -> Signal<String> {
    let debounced = RwSignal::new(source.get_untracked());
    let pending: Rc<Cell<Option<TimeoutHandle>>> = Rc::new(Cell::new(None));

    {
        let pending = pending.clone();
        on_cleanup(move || {
            if let Some(handle) = pending.take() {
                handle.clear();
            }
        });
    }

    create_effect(move |_| {
        let value = source.get();
        if let Some(handle) = pending.take() {
            handle.clear();
        }
        let handle = set_timeout_with_handle(move || debounced.set(value), delay).ok();
        pending.set(handle);
    });

    debounced.into()
}
