mod addresses;
mod allergens;
mod get;
mod update;

pub use addresses::*;
pub use allergens::*;
pub use get::*;
pub use update::*;
