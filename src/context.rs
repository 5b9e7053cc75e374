//! Everything a request needs besides its own options.
//!
//! A [`FetchContext`] bundles the transport, the page the request is made from, the
//! navigator used for authentication redirects, the optional turbo stream renderer and
//! the interceptor slot. Contexts are cheap to clone and safe to share between tasks.

use crate::config::TransportConfig;
use crate::errors::TransportError;
use crate::interceptor::InterceptorSlot;
use crate::net::{ReqwestTransport, TransportHandle};
use crate::page::{Navigator, Page};
use crate::render::StreamRendererHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct FetchContext {
    transport: TransportHandle,
    page: Arc<Page>,
    navigator: Arc<dyn Navigator>,
    stream_renderer: Option<StreamRendererHandle>,
    interceptors: InterceptorSlot,
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("page", &self.page)
            .field("stream_renderer", &self.stream_renderer.is_some())
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}

impl FetchContext {
    /// Entry point to start building a context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::default()
    }

    /// Context with a reqwest transport, an empty page and the global interceptor.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    pub fn transport(&self) -> &TransportHandle {
        &self.transport
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn stream_renderer(&self) -> Option<StreamRendererHandle> {
        self.stream_renderer.clone()
    }

    pub fn interceptors(&self) -> &InterceptorSlot {
        &self.interceptors
    }
}

#[derive(Default)]
pub struct FetchContextBuilder {
    config: Option<TransportConfig>,
    transport: Option<TransportHandle>,
    page: Option<Arc<Page>>,
    navigator: Option<Arc<dyn Navigator>>,
    stream_renderer: Option<StreamRendererHandle>,
    interceptors: Option<InterceptorSlot>,
}

impl FetchContextBuilder {
    /// Configuration for the default reqwest transport. Ignored when a transport is set.
    ///
    /// Without a `base_url`, relative request URLs resolve against the page location.
    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn transport(mut self, transport: TransportHandle) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn page(mut self, page: impl Into<Arc<Page>>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Navigator used on authentication redirects. Defaults to the page itself.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn stream_renderer(mut self, renderer: StreamRendererHandle) -> Self {
        self.stream_renderer = Some(renderer);
        self
    }

    /// Interceptor slot to consult. Defaults to [`InterceptorSlot::global`].
    pub fn interceptors(mut self, slot: InterceptorSlot) -> Self {
        self.interceptors = Some(slot);
        self
    }

    pub fn build(self) -> Result<FetchContext, TransportError> {
        let page = self.page.unwrap_or_default();

        let transport: TransportHandle = match self.transport {
            Some(transport) => transport,
            None => {
                let mut config = self.config.unwrap_or_default();
                if config.base_url.is_none() {
                    config.base_url = page.location();
                }
                Arc::new(ReqwestTransport::new(config)?)
            }
        };

        let navigator: Arc<dyn Navigator> = match self.navigator {
            Some(navigator) => navigator,
            None => page.clone(),
        };

        Ok(FetchContext {
            transport,
            page,
            navigator,
            stream_renderer: self.stream_renderer,
            interceptors: self.interceptors.unwrap_or_else(InterceptorSlot::global),
        })
    }
}
