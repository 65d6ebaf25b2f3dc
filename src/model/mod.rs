pub mod board;
pub mod column;
pub mod config;
pub mod ids;
pub mod project;
pub mod task;
pub mod user;

pub use board::*;
pub use column::*;
pub use config::*;
pub use ids::*;
pub use project::*;
pub use task::*;
pub use user::*;
