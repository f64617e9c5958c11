mod cell;
mod sheet;
mod table;
mod util;

pub use self::cell::*;
pub use self::sheet::*;
pub use self::table::*;
pub use self::util::*;
