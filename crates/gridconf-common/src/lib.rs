pub mod address;
pub mod diagnostic;
pub mod page;
pub mod rect;
pub mod value;

pub use address::*;
pub use diagnostic::*;
pub use page::*;
pub use rect::*;
pub use value::*;
