pub mod detected_face;
pub mod face;
pub mod face_detector;
pub mod face_grouper;
pub mod face_service_error;
pub mod photo;
pub mod photo_batch;
