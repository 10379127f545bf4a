use crate::error::AppError;

/// Snapshot of a single request's lifecycle: Idle → Loading → Success/Failed.
///
/// Owned exclusively by the hook instance that created it; only that
/// instance's transitions mutate it, and it is discarded with the instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    /// Last successfully loaded value, retained while a refetch runs.
    pub data: Option<T>,
    /// A request is currently in flight.
    pub loading: bool,
    /// Terminal error of the most recent cycle.
    pub error: Option<AppError>,
}

impl<T> RequestState<T> {
    /// The initial state: nothing loaded, nothing in flight.
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    /// Enter Loading. Clears any terminal error from the previous cycle and
    /// keeps the last data visible while the request runs.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Terminal success.
    pub fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// Terminal success for requests that may not carry a body (DELETE).
    pub fn finish(&mut self, data: Option<T>) {
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    /// Terminal failure. Data from previous cycles stays visible.
    pub fn fail(&mut self, error: AppError) {
        self.loading = false;
        self.error = Some(error);
    }

    /// Back to Idle with cleared data and error.
    pub fn reset(&mut self) {
        *self = Self::idle();
    }
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
