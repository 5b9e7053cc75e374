//! Request side: [`FetchRequest`], its [`RequestOptions`] and the derived [`FetchOptions`].

mod fetch_request;
mod options;
mod query;

pub use fetch_request::FetchRequest;
pub use options::{
    Credentials, FetchOptions, File, FormData, FormValue, QuerySource, RedirectMode, RequestBody,
    RequestOptions, ResponseKind,
};
