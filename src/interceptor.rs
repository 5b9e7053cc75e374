//! Request interception.
//!
//! At most one [`RequestInterceptor`] is active per [`InterceptorSlot`]. It runs right
//! before a request is handed to the transport and may mutate it, typically to add an
//! auth header. Registering replaces the previous interceptor.
//!
//! The process-wide slot behind [`register`], [`get`] and [`reset`] is what a default
//! [`FetchContext`](crate::context::FetchContext) uses. Tests and embedders that need
//! isolation can give a context its own slot.

use crate::request::FetchRequest;
use async_trait::async_trait;
use lazy_static::lazy_static;
use std::sync::{Arc, PoisonError, RwLock};

/// Hook run before every request of a context.
///
/// An error is logged by the caller and the request proceeds unchanged.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn intercept(&self, request: &mut FetchRequest) -> anyhow::Result<()>;
}

pub type InterceptorHandle = Arc<dyn RequestInterceptor>;

/// Holds zero or one interceptor.
#[derive(Clone, Default)]
pub struct InterceptorSlot(Arc<RwLock<Option<InterceptorHandle>>>);

lazy_static! {
    static ref GLOBAL: InterceptorSlot = InterceptorSlot::new();
}

impl InterceptorSlot {
    /// Creates an empty slot that is not shared with the global one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide slot.
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    pub fn register(&self, interceptor: InterceptorHandle) {
        log::debug!("Registering request interceptor");
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(interceptor);
    }

    pub fn get(&self) -> Option<InterceptorHandle> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn reset(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_registered(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// True when both handles point to the same slot.
    pub fn same_slot(&self, other: &InterceptorSlot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for InterceptorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorSlot")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// Registers the process-wide interceptor, replacing any previous one.
pub fn register(interceptor: InterceptorHandle) {
    GLOBAL.register(interceptor);
}

/// Returns the process-wide interceptor.
pub fn get() -> Option<InterceptorHandle> {
    GLOBAL.get()
}

/// Clears the process-wide interceptor.
pub fn reset() {
    GLOBAL.reset();
}
