mod mem;
mod sled;

pub use self::mem::*;
pub use self::sled::*;
