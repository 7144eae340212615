pub mod contract;
pub mod movie;

/// Path where movie resource is mounted
pub const MOVIES_PATH: &str = "/api/movies";
