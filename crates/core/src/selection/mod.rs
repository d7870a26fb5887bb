pub mod best_face;
pub mod most_common_face;
