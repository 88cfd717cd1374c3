mod billing;
mod dashboard;

pub use billing::*;
pub use dashboard::*;
