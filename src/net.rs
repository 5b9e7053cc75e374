//! Network layer: the [`Transport`] seam, the raw [`Response`] it produces and the
//! reqwest-backed [`ReqwestTransport`].

mod fetch;
mod response;
mod transport;

pub use fetch::ReqwestTransport;
pub use response::{Body, Response};
pub use transport::{Transport, TransportHandle};

#[cfg(test)]
pub(crate) use transport::mock;
