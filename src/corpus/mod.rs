pub mod aggregate;
pub mod outdir;
pub mod run;
pub mod totag;

pub use aggregate::*;
pub use outdir::*;
pub use run::*;
pub use totag::*;
