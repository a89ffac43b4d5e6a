//! Reading the text to translate.

mod normalize;
mod reader;

pub use normalize::join_wrapped_lines;
pub use reader::InputReader;
