//! Resource gateways: one module per linkding resource.
//!
//! Each gateway is a set of stateless functions taking a borrowed [`Client`]. They own
//! the path templates and payload shapes for their resource and nothing else; input
//! normalization happens in the API facade.
//!
//! [`Client`]: crate::client::Client

pub mod assets;
pub mod bookmarks;
pub mod bundles;
pub mod tags;
pub mod user;
