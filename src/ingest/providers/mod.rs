pub mod feed_rss;
pub mod social_api;
