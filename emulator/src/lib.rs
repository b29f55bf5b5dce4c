pub mod constants;
pub mod parser;
pub mod runtime;

pub use self::parser::parse;
