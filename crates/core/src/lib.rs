pub mod annotation;
pub mod detection;
pub mod pipeline;
pub mod shared;
pub mod snapshot;
pub mod video;
