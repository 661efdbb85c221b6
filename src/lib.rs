//! favtube library
//!
//! Channel search, a latest-upload feed over favorite channels, and the
//! local stores behind the favtube CLI.

pub mod core;
pub mod error;
pub mod storage;
pub mod types;
pub mod ui;
pub mod utils;

pub use crate::core::{ChannelResolver, VideoAggregator};
pub use crate::error::{FavtubeError, Result};
pub use crate::types::{Channel, Video};
