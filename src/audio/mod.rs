pub mod extract;
pub mod wav;

pub use extract::*;
pub use wav::*;
