pub mod markup;

pub use markup::{parse_markup, ParseFailure};
