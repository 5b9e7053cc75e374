pub mod config;
pub mod context;
pub mod cookies;
pub mod errors;
pub mod interceptor;
pub mod net;
pub mod page;
pub mod render;
pub mod request;
pub mod response;
pub mod verbs;

pub use config::TransportConfig;
pub use context::{FetchContext, FetchContextBuilder};
pub use errors::{FetchError, TransportError};
pub use interceptor::{InterceptorSlot, RequestInterceptor};
pub use page::{Navigator, Page};
pub use render::StreamRenderer;
pub use request::{FetchRequest, RequestOptions};
pub use response::FetchResponse;
pub use verbs::{destroy, get, patch, post, put};
