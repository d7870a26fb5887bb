pub mod analysis_executor;
pub mod best_face_use_case;
pub mod infrastructure;
pub mod pipeline_error;
pub mod submit_batch;
