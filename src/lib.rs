// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod docker_repo;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod networks;
pub mod normalize;
pub mod render;
pub mod source;
pub mod version;
pub mod watch;
