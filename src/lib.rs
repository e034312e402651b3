// Core modules
pub mod annotations;
pub mod config;
pub mod delays;
pub mod github;
pub mod utils;

// Re-export key types and functions
pub use config::{ToolkitConfig, load_config};
pub use delays::{
    GeneratorSettings, async_comprehension, async_generator, measure_runtime, measure_time,
    task_wait_n, task_wait_random, wait_n, wait_random,
};
pub use github::{FixtureFetcher, JsonFetcher, OrgClient};
pub use utils::{KeyNotFound, Memo, Memoized, Nested, access, access_nested_map, memoize};
