pub mod compiler;
pub mod diff;
pub mod judge;
pub mod observer;
pub mod result;
pub mod runner;
pub mod sandbox;
pub mod testcase;

pub use compiler::*;
pub use diff::*;
pub use judge::*;
pub use observer::*;
pub use result::*;
pub use runner::*;
pub use sandbox::*;
pub use testcase::*;
