pub mod normalize;
pub mod quality;

pub use normalize::normalize;
pub use quality::clean;
