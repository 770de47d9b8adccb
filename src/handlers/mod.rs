//! Request handlers (spec.md §4.5, §4.6): GET and POST, the only two
//! methods with defined behavior.

pub(crate) mod get;
pub(crate) mod post;
