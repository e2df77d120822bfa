pub mod folder;

pub use self::folder::*;
