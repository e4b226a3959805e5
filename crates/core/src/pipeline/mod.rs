pub mod infrastructure;
pub mod pipeline_logger;
pub mod preview_masks_use_case;
pub mod retouch_sequence_use_case;
pub mod retouch_session;
pub mod session_executor;
