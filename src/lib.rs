pub mod args;
pub mod config;
pub mod country;
pub mod dom;
pub mod extract;
pub mod faction;
pub mod fetch;
pub mod http_client;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod registry;
