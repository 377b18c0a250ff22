pub mod richtext;

pub use richtext::RichTextValidator;
