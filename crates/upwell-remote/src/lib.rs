//! Client for the update-distribution API.
//!
//! Everything in this crate is independent of a concrete host integration:
//! - Lenient semantic-version parsing and strict newer-than ordering.
//! - The remote descriptor wire model (which doubles as the cache record
//!   format).
//! - The descriptor source seam and its HTTP implementation.

mod descriptor;
mod fetch;
mod version;

pub use descriptor::RemoteDescriptor;
pub use fetch::{
    DescriptorSource, FetchError, FetchRequest, HttpSource, extension_meta, fetch_descriptor,
};
pub use version::{is_newer, parse_lenient};
