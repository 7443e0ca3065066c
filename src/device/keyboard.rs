pub mod driver;
pub mod raw;

pub use self::driver::{CommandInterpreter, Response};
pub use self::raw::StatusIndicators;
