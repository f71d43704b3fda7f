//! Transport layer: URL and wire details shared by the client operations.

mod routing;

pub use routing::{SEND_TYPE_FIELD, join_endpoint, query_pairs, split_send_type};
