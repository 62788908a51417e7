//! Tree construction for a single fragment
//!
//! - `builder`: defaults merge, `viewUrl`/`viewGroup` resolution, recursion
//! - `transfer`: fragment-wide metadata bound for the first node

pub mod builder;
pub mod transfer;

pub use builder::{resolve_view_group, resolve_view_url, url_origin, TreeBuilder};
pub use transfer::transfer_side_channel;
