pub mod drag;
pub mod position;
pub mod store_ops;
