pub mod noise;
pub mod speaker;

pub use noise::*;
pub use speaker::*;
