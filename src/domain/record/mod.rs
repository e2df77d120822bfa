pub mod record;
pub mod records;

pub use self::record::*;
pub use self::records::*;
