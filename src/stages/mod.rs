pub mod stage0_detect;
pub mod stage1_assemble;
pub mod stage2_corpus;

pub use stage0_detect::*;
pub use stage1_assemble::*;
pub use stage2_corpus::*;
