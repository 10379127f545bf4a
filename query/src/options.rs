use std::rc::Rc;
use std::time::Duration;

use crate::error::AppError;

/// Default retries for reads.
pub const DEFAULT_RETRY_COUNT: u32 = 3;
/// Default retries for writes.
pub const DEFAULT_MUTATION_RETRY_COUNT: u32 = 1;
/// Default base backoff delay.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
/// Default page size for paginated reads.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Callback fired with the parsed payload on success.
pub type SuccessFn<T> = Rc<dyn Fn(&T)>;
/// Callback fired with the payload of a write, which is absent for DELETE.
pub type MutationSuccessFn<T> = Rc<dyn Fn(Option<&T>)>;
/// Callback fired with the terminal error.
pub type ErrorFn = Rc<dyn Fn(&AppError)>;

/// Options for [`use_resource()`](crate::use_resource()) and
/// [`use_api()`](crate::use_api()).
pub struct ResourceOptions<T> {
    /// Fetch on mount. When false the caller starts the first fetch with
    /// `refetch()`.
    pub immediate: bool,
    /// Additional attempts after the first failure.
    pub retry_count: u32,
    /// Base backoff delay; doubles per attempt.
    pub retry_delay: Duration,
    /// Invoked with the parsed payload after a successful fetch.
    pub on_success: Option<SuccessFn<T>>,
    /// Invoked with the terminal error after retries are exhausted.
    pub on_error: Option<ErrorFn>,
}

impl<T> ResourceOptions<T> {
    /// Set whether the first fetch fires on mount.
    pub fn set_immediate(self, immediate: bool) -> Self {
        Self { immediate, ..self }
    }

    /// Set the retry count.
    pub fn set_retry_count(self, retry_count: u32) -> Self {
        Self {
            retry_count,
            ..self
        }
    }

    /// Set the base backoff delay.
    pub fn set_retry_delay(self, retry_delay: Duration) -> Self {
        Self {
            retry_delay,
            ..self
        }
    }

    /// Attach a success callback.
    pub fn on_success(self, callback: impl Fn(&T) + 'static) -> Self {
        Self {
            on_success: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach an error callback.
    pub fn on_error(self, callback: impl Fn(&AppError) + 'static) -> Self {
        Self {
            on_error: Some(Rc::new(callback)),
            ..self
        }
    }
}

impl<T> Default for ResourceOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for ResourceOptions<T> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ResourceOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceOptions")
            .field("immediate", &self.immediate)
            .field("retry_count", &self.retry_count)
            .field("retry_delay", &self.retry_delay)
            .field("on_success", &self.on_success.as_ref().map(|_| "..."))
            .field("on_error", &self.on_error.as_ref().map(|_| "..."))
            .finish()
    }
}

/// Options for [`use_mutation()`](crate::use_mutation()).
pub struct MutationOptions<V, T> {
    /// Additional attempts after the first failure.
    pub retry_count: u32,
    /// Base backoff delay; doubles per attempt.
    pub retry_delay: Duration,
    /// Fires synchronously with the variables before the request starts.
    pub on_mutate: Option<Rc<dyn Fn(&V)>>,
    /// Invoked with the decoded payload (absent for DELETE) on success.
    pub on_success: Option<MutationSuccessFn<T>>,
    /// Invoked with the terminal error before it is re-thrown.
    pub on_error: Option<ErrorFn>,
}

impl<V, T> MutationOptions<V, T> {
    /// Set the retry count.
    pub fn set_retry_count(self, retry_count: u32) -> Self {
        Self {
            retry_count,
            ..self
        }
    }

    /// Set the base backoff delay.
    pub fn set_retry_delay(self, retry_delay: Duration) -> Self {
        Self {
            retry_delay,
            ..self
        }
    }

    /// Attach a pre-request callback.
    pub fn on_mutate(self, callback: impl Fn(&V) + 'static) -> Self {
        Self {
            on_mutate: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach a success callback.
    pub fn on_success(self, callback: impl Fn(Option<&T>) + 'static) -> Self {
        Self {
            on_success: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach an error callback.
    pub fn on_error(self, callback: impl Fn(&AppError) + 'static) -> Self {
        Self {
            on_error: Some(Rc::new(callback)),
            ..self
        }
    }
}

impl<V, T> Default for MutationOptions<V, T> {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_MUTATION_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_mutate: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<V, T> Clone for MutationOptions<V, T> {
    fn clone(&self) -> Self {
        Self {
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            on_mutate: self.on_mutate.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

/// Options for [`use_optimistic_mutation()`](crate::use_optimistic_mutation()).
pub struct OptimisticMutationOptions<V, T> {
    /// Additional attempts after the first failure.
    pub retry_count: u32,
    /// Base backoff delay; doubles per attempt.
    pub retry_delay: Duration,
    /// Computes the optimistic value written to state before any I/O.
    pub on_mutate: Option<Rc<dyn Fn(&V) -> T>>,
    /// Fires with the captured previous value when a failed call rolls back.
    pub on_rollback: Option<Rc<dyn Fn(Option<&T>)>>,
    /// Invoked with the decoded payload (absent for DELETE) on success.
    pub on_success: Option<MutationSuccessFn<T>>,
    /// Invoked with the terminal error before it is re-thrown.
    pub on_error: Option<ErrorFn>,
}

impl<V, T> OptimisticMutationOptions<V, T> {
    /// Set the retry count.
    pub fn set_retry_count(self, retry_count: u32) -> Self {
        Self {
            retry_count,
            ..self
        }
    }

    /// Set the base backoff delay.
    pub fn set_retry_delay(self, retry_delay: Duration) -> Self {
        Self {
            retry_delay,
            ..self
        }
    }

    /// Attach the optimistic-value producer.
    pub fn on_mutate(self, callback: impl Fn(&V) -> T + 'static) -> Self {
        Self {
            on_mutate: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach a rollback observer.
    pub fn on_rollback(self, callback: impl Fn(Option<&T>) + 'static) -> Self {
        Self {
            on_rollback: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach a success callback.
    pub fn on_success(self, callback: impl Fn(Option<&T>) + 'static) -> Self {
        Self {
            on_success: Some(Rc::new(callback)),
            ..self
        }
    }

    /// Attach an error callback.
    pub fn on_error(self, callback: impl Fn(&AppError) + 'static) -> Self {
        Self {
            on_error: Some(Rc::new(callback)),
            ..self
        }
    }
}

impl<V, T> Default for OptimisticMutationOptions<V, T> {
    fn default() -> Self {
        Self {
            retry_count: DEFAULT_MUTATION_RETRY_COUNT,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_mutate: None,
            on_rollback: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<V, T> Clone for OptimisticMutationOptions<V, T> {
    fn clone(&self) -> Self {
        Self {
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            on_mutate: self.on_mutate.clone(),
            on_rollback: self.on_rollback.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

/// Options for [`use_polling()`](crate::use_polling()).
pub struct PollingOptions<T> {
    /// Start polling immediately on mount.
    pub enabled: bool,
    /// Options for the underlying resource fetch. `immediate` is ignored;
    /// the polling hook drives all fetches itself.
    pub resource: ResourceOptions<T>,
}

impl<T> PollingOptions<T> {
    /// Set whether polling starts enabled.
    pub fn set_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Replace the underlying resource options.
    pub fn set_resource(self, resource: ResourceOptions<T>) -> Self {
        Self { resource, ..self }
    }
}

impl<T> Default for PollingOptions<T> {
    fn default() -> Self {
        Self {
            enabled: true,
            resource: ResourceOptions::default(),
        }
    }
}

impl<T> Clone for PollingOptions<T> {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            resource: self.resource.clone(),
        }
    }
}

/// Options for [`use_infinite_query()`](crate::use_infinite_query()).
pub struct InfiniteQueryOptions<T> {
    /// Requested page size; a shorter page ends the stream.
    pub limit: u32,
    /// Additional attempts per page after the first failure. The original
    /// behavior is a single attempt, hence the 0 default.
    pub retry_count: u32,
    /// Base backoff delay; doubles per attempt.
    pub retry_delay: Duration,
    /// Computes the next cursor from the last page and all pages. Used once
    /// at least one page exists; before that the offset cursor applies.
    pub get_next_page_param: Option<Rc<dyn Fn(&[T], &[Vec<T>]) -> String>>,
}

impl<T> InfiniteQueryOptions<T> {
    /// Set the page size.
    pub fn set_limit(self, limit: u32) -> Self {
        Self { limit, ..self }
    }

    /// Set the retry count.
    pub fn set_retry_count(self, retry_count: u32) -> Self {
        Self {
            retry_count,
            ..self
        }
    }

    /// Attach a custom cursor function.
    pub fn get_next_page_param(
        self,
        callback: impl Fn(&[T], &[Vec<T>]) -> String + 'static,
    ) -> Self {
        Self {
            get_next_page_param: Some(Rc::new(callback)),
            ..self
        }
    }
}

impl<T> Default for InfiniteQueryOptions<T> {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            retry_count: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            get_next_page_param: None,
        }
    }
}

impl<T> Clone for InfiniteQueryOptions<T> {
    fn clone(&self) -> Self {
        Self {
            limit: self.limit,
            retry_count: self.retry_count,
            retry_delay: self.retry_delay,
            get_next_page_param: self.get_next_page_param.clone(),
        }
    }
}
