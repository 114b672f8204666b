//! Request model: method, key/value pairs, body and the request itself.

mod body;
mod method;
mod pair;
mod spec;

pub use body::{
    BinarySource, BodyMode, BodySpec, FormDataField, FormValue, JsonContent, json_to_pairs,
    pairs_to_json,
};
pub use method::HttpMethod;
pub use pair::{KeyValuePair, active_pairs};
pub use spec::RequestSpec;
