pub mod detection;
pub mod imaging;
pub mod pipeline;
pub mod selection;
pub mod shared;
