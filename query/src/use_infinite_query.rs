use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use leptos::*;
use serde::de::DeserializeOwned;

use crate::client::use_api_client;
use crate::error::AppError;
use crate::options::InfiniteQueryOptions;
use crate::retry::with_retry;

type PageLoader<T> =
    Rc<dyn Fn(String, u32) -> Pin<Box<dyn Future<Output = Result<Vec<T>, AppError>>>>>;

/// Cursor-paginated accumulation of pages into a flat ordered sequence.
///
/// The loader receives `(cursor, limit)` and returns one page. Pages only
/// ever append; a page shorter than `limit` ends the stream (short-page
/// heuristic, not an explicit total count). [`use_infinite_query()`] wires
/// the loader to the shared [`ApiClient`](crate::ApiClient).
pub fn use_paged_resource<T, Fu>(
    loader: impl Fn(String, u32) -> Fu + 'static,
    options: InfiniteQueryOptions<T>,
) -> InfiniteQueryHandle<T>
where
    T: Clone + 'static,
    Fu: Future<Output = Result<Vec<T>, AppError>> + 'static,
{
    let pages: RwSignal<Vec<Vec<T>>> = RwSignal::new(Vec::new());
    let loading = RwSignal::new(false);
    let error = RwSignal::new(None::<AppError>);
    let has_next_page = RwSignal::new(true);

    let loader: PageLoader<T> = Rc::new(move |cursor, limit| {
        Box::pin(loader(cursor, limit)) as Pin<Box<dyn Future<Output = Result<Vec<T>, AppError>>>>
    });

    InfiniteQueryHandle {
        data: Signal::derive(move || pages.with(|p| p.iter().flatten().cloned().collect())),
        loading: loading.into(),
        error: error.into(),
        has_next_page: has_next_page.into(),
        pages,
        loading_inner: loading,
        error_inner: error,
        has_next_inner: has_next_page,
        loader,
        options: Rc::new(options),
    }
}

/// An infinite query backed by `GET {path}?limit={limit}&cursor={cursor}`
/// against the configured API root.
pub fn use_infinite_query<T>(
    path: impl Into<String>,
    options: InfiniteQueryOptions<T>,
) -> InfiniteQueryHandle<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let client = use_api_client();
    let path = path.into();
    use_paged_resource(
        move |cursor: String, limit: u32| {
            let client = client.clone();
            let path = path.clone();
            async move {
                let params = [("limit", limit.to_string()), ("cursor", cursor)];
                client.get_json_with_params::<Vec<T>>(&path, &params).await
            }
        },
        options,
    )
}

/// Reactive handle returned by [`use_paged_resource()`]/[`use_infinite_query()`].
#[derive(Clone)]
pub struct InfiniteQueryHandle<T: 'static> {
    /// All fetched items, flattened in page order.
    pub data: Signal<Vec<T>>,
    /// A page fetch is in flight.
    pub loading: Signal<bool>,
    /// Terminal error of the most recent page fetch.
    pub error: Signal<Option<AppError>>,
    /// False once a short page signalled end-of-data.
    pub has_next_page: Signal<bool>,

    pages: RwSignal<Vec<Vec<T>>>,
    loading_inner: RwSignal<bool>,
    error_inner: RwSignal<Option<AppError>>,
    has_next_inner: RwSignal<bool>,
    loader: PageLoader<T>,
    options: Rc<InfiniteQueryOptions<T>>,
}

impl<T> InfiniteQueryHandle<T>
where
    T: Clone + 'static,
{
    /// Fetch and append the next page.
    ///
    /// No-op while a page fetch is in flight or after end-of-data. Errors
    /// land in [`error`](Self::error) rather than being re-thrown; the
    /// sequence fetched so far stays intact.
    pub async fn fetch_next_page(&self) {
        if self.loading_inner.get_untracked() || !self.has_next_inner.get_untracked() {
            return;
        }

        self.loading_inner.set(true);
        self.error_inner.set(None);

        let options = self.options.clone();
        let cursor = self.next_cursor();
        let loader = self.loader.clone();
        let limit = options.limit;
        let result = with_retry(
            move || loader(cursor.clone(), limit),
            options.retry_count,
            options.retry_delay,
        )
        .await;

        match result {
            Ok(page) => {
                if (page.len() as u32) < options.limit {
                    self.has_next_inner.set(false);
                }
                self.pages.update(|pages| pages.push(page));
            }
            Err(error) => self.error_inner.set(Some(error)),
        }
        self.loading_inner.set(false);
    }

    /// Fire-and-forget variant of [`fetch_next_page()`](Self::fetch_next_page)
    /// for scroll handlers.
    pub fn load_more(&self) {
        let this = self.clone();
        spawn_local(async move { this.fetch_next_page().await });
    }

    /// Drop all pages and state, re-enabling [`has_next_page`](Self::has_next_page).
    pub fn reset(&self) {
        self.pages.set(Vec::new());
        self.loading_inner.set(false);
        self.error_inner.set(None);
        self.has_next_inner.set(true);
    }

    // The caller-supplied cursor function applies once at least one page
    // exists; before that the offset cursor starts at zero.
    fn next_cursor(&self) -> String {
        self.pages.with_untracked(|pages| {
            match (self.options.get_next_page_param.as_ref(), pages.last()) {
                (Some(next_param), Some(last_page)) => next_param(last_page, pages),
                _ => offset_cursor(pages.len(), self.options.limit),
            }
        })
    }
}

/// Default cursor: items already fetched, as a string offset.
pub(crate) fn offset_cursor(page_count: usize, limit: u32) -> String {
    (page_count as u64 * limit as u64).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    // Serves fixed-size pages from a vec of lengths; records requested cursors.
    fn page_server(
        lengths: Vec<usize>,
        cursors: Rc<RefCell<Vec<String>>>,
    ) -> impl Fn(String, u32) -> Pin<Box<dyn Future<Output = Result<Vec<u32>, AppError>>>> {
        let served = RefCell::new(0usize);
        move |cursor, _limit| {
            cursors.borrow_mut().push(cursor);
            let index = *served.borrow();
            *served.borrow_mut() += 1;
            let length = lengths.get(index).copied().unwrap_or(0);
            Box::pin(async move { Ok((0..length as u32).collect()) })
        }
    }

    #[tokio::test]
    async fn a_short_page_ends_the_stream() {
        let _ = create_runtime();
        let cursors = Rc::new(RefCell::new(Vec::new()));
        let handle = use_paged_resource(
            page_server(vec![20, 20, 7], cursors.clone()),
            InfiniteQueryOptions::default(),
        );

        handle.fetch_next_page().await;
        handle.fetch_next_page().await;
        handle.fetch_next_page().await;

        assert_eq!(handle.data.get_untracked().len(), 47, "20 + 20 + 7 items");
        assert!(!handle.has_next_page.get_untracked());
        assert_eq!(
            *cursors.borrow(),
            vec!["0".to_string(), "20".to_string(), "40".to_string()],
            "default cursor is pages * limit"
        );

        // Exhausted: further calls are no-ops.
        handle.fetch_next_page().await;
        assert_eq!(handle.data.get_untracked().len(), 47);
        assert_eq!(cursors.borrow().len(), 3);
    }

    #[tokio::test]
    async fn custom_cursor_function_takes_over_after_the_first_page() {
        let _ = create_runtime();
        let cursors = Rc::new(RefCell::new(Vec::new()));
        let handle = use_paged_resource(
            page_server(vec![20, 20], cursors.clone()),
            InfiniteQueryOptions::default().get_next_page_param(
                |last_page: &[u32], _all: &[Vec<u32>]| {
                    format!("after-{}", last_page.last().copied().unwrap_or(0))
                },
            ),
        );

        handle.fetch_next_page().await;
        handle.fetch_next_page().await;

        assert_eq!(
            *cursors.borrow(),
            vec!["0".to_string(), "after-19".to_string()]
        );
    }

    #[tokio::test]
    async fn a_failed_page_keeps_the_sequence_intact() {
        let _ = create_runtime();
        let served = Rc::new(RefCell::new(0usize));
        let handle = use_paged_resource(
            {
                let served = served.clone();
                move |_cursor: String, limit: u32| {
                    let index = *served.borrow();
                    *served.borrow_mut() += 1;
                    Box::pin(async move {
                        if index == 0 {
                            Ok((0..limit).collect::<Vec<u32>>())
                        } else {
                            Err(AppError::server("boom", 502))
                        }
                    })
                        as Pin<Box<dyn Future<Output = Result<Vec<u32>, AppError>>>>
                }
            },
            InfiniteQueryOptions::default(),
        );

        handle.fetch_next_page().await;
        handle.fetch_next_page().await;

        assert_eq!(handle.data.get_untracked().len(), 20);
        assert!(handle.error.get_untracked().is_some());
        assert!(
            handle.has_next_page.get_untracked(),
            "a failure is not an end-of-data signal"
        );
        assert!(!handle.loading.get_untracked());
    }

    #[tokio::test]
    async fn reset_clears_pages_and_reenables_fetching() {
        let _ = create_runtime();
        let cursors = Rc::new(RefCell::new(Vec::new()));
        let handle = use_paged_resource(
            page_server(vec![5], cursors.clone()),
            InfiniteQueryOptions::default(),
        );

        handle.fetch_next_page().await;
        assert!(!handle.has_next_page.get_untracked());

        handle.reset();
        assert!(handle.data.get_untracked().is_empty());
        assert!(handle.has_next_page.get_untracked());
        assert!(handle.error.get_untracked().is_none());
    }

    #[test]
    fn offset_cursor_scales_with_limit() {
        assert_eq!(offset_cursor(0, 20), "0");
        assert_eq!(offset_cursor(3, 20), "60");
        assert_eq!(offset_cursor(2, 50), "100");
    }
}
