//! Channel search, feed aggregation and the API plumbing beneath them

pub mod aggregator;
pub mod api;
pub mod duration;
pub mod feed;
pub mod resolver;
pub mod schema;

pub use aggregator::VideoAggregator;
pub use api::{ApiTransport, Transport};
pub use resolver::ChannelResolver;
