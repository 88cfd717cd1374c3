mod intent;
mod status;

pub use intent::*;
pub use status::*;
