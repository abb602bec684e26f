//! The network identity record and its decoded forms.
//!
//! - [`NetworkIdentity`] / [`NetworkTuple`] - the fixed 64-byte wire record
//! - [`FlowIdentity`] - an owned, decoded view for display and JSON
//! - [`AddressFamily`], [`Protocol`], [`SocketType`], [`SocketState`] - names
//!   for the raw integers in the record

pub mod flow;
pub mod record;
pub mod types;

pub use flow::FlowIdentity;
pub use record::{IPV6_LEN, NetworkIdentity, NetworkTuple};
pub use types::{AddressFamily, Protocol, SocketType, SocketState};
