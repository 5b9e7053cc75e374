use crate::errors::TransportError;
use crate::net::Response;
use crate::request::FetchOptions;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one request and hands back the raw response.
///
/// The transport owns everything below the request/response model: connections,
/// TLS, redirects and cancellation. Options are passed exactly as derived, including
/// the caller's cancellation token.
///
/// # Implementations
///
/// - [`ReqwestTransport`](crate::net::ReqwestTransport): production implementation using `reqwest`
/// - Mock implementations for testing
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Response, TransportError>;
}

/// Shared handle to a [`Transport`].
pub type TransportHandle = Arc<dyn Transport>;

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn() -> Result<Response, TransportError> + Send + Sync>;

    /// Records every call and answers with a freshly built response.
    pub(crate) struct MockTransport {
        calls: Mutex<Vec<(String, FetchOptions)>>,
        respond: Responder,
    }

    impl MockTransport {
        pub(crate) fn new<F>(respond: F) -> Arc<Self>
        where
            F: Fn() -> Result<Response, TransportError> + Send + Sync + 'static,
        {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        pub(crate) fn ok() -> Arc<Self> {
            Self::new(|| Ok(Response::new(200).with_body("done")))
        }

        pub(crate) fn calls(&self) -> Vec<(String, FetchOptions)> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<Response, TransportError> {
            self.calls.lock().unwrap().push((url.to_string(), options.clone()));
            (self.respond)()
        }
    }
}
