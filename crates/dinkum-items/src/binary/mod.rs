pub mod layout;
mod reader;

#[cfg(test)]
pub mod mock;

pub use reader::{ReadBytes, align4};
