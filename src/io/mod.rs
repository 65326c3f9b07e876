pub mod input;
pub mod metadata;
pub mod output;
pub mod xml;

pub use input::*;
pub use metadata::*;
pub use output::*;
pub use xml::XmlElement;
