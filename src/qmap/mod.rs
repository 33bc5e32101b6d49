pub mod repr;

pub mod view;

#[cfg(feature = "std")]
mod lexer;

#[cfg(feature = "std")]
pub mod parser;

#[cfg(feature = "std")]
pub mod result;

pub use repr::{
    Axis, Brush, CheckWritable, Entity, Face, Level, Point, Properties,
    Transform, ValidationResult,
};

pub use view::PropertyView;

#[cfg(feature = "std")]
pub use repr::Writes;

#[cfg(feature = "std")]
pub use parser::{parse, parse_into, parse_str};

#[cfg(feature = "std")]
pub use result::{Error, LineError, Result};




#[cfg(all(test, feature = "std"))]
mod parser_test;
