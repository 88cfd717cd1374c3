mod account;
mod redeem;

pub use account::*;
pub use redeem::*;
