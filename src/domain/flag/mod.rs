pub mod custom;
pub mod flag;
pub mod flags;

pub use self::custom::*;
pub use self::flag::*;
pub use self::flags::*;
