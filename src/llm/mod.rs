pub mod context;
pub mod fallback;
pub mod gateway;
