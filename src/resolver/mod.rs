//! Geometry-class presence resolution.
//!
//! This module decides which semantic channels a draw call carries, based on
//! its [`GeometryFlags`](crate::types::GeometryFlags).

mod presence;

pub use presence::{resolve_channels, ActiveChannel, ChannelVariant};
