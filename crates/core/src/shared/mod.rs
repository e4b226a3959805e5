pub mod config;
pub mod error;
pub mod filters;
pub mod float_frame;
pub mod frame;
pub mod landmarks;
pub mod mask;
pub mod stream_info;
