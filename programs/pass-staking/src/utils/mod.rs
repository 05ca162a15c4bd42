pub mod account;
pub use account::*;

pub mod pass;
pub use pass::*;

pub mod token;
pub use token::*;
