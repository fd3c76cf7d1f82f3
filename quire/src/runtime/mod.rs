pub mod commands;
pub mod executor;
pub mod scripts;

pub use commands::{MutationCommand, MutationPlan};
pub use executor::{MutationExecutor, RedisExecutor, decode_response, execute_plan};
