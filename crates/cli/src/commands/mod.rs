pub mod evaluate;
pub mod init;
pub mod names;
pub mod uniqueness;
pub mod util;

pub use evaluate::*;
pub use init::*;
pub use names::*;
pub use uniqueness::*;
pub use util::*;
