pub mod document;
pub mod instance;
pub mod pattern;
pub mod protocol;
pub mod roster;

pub use document::*;
pub use instance::*;
pub use pattern::*;
pub use protocol::*;
pub use roster::*;
