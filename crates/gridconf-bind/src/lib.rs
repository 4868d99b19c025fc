//! ID normalization, validation and two-pass binding of parsed tables into a
//! [`ConfigModel`].

pub mod binding;
pub mod error;
pub mod model;
pub mod normalize;
pub mod validate;

pub use binding::bind;
pub use error::{BindError, CellRef};
pub use model::{ConfigModel, Item, Table};
pub use normalize::normalize_ids;
pub use validate::{OVERLAP_MARGIN, is_valid_field_name, is_valid_type_name, validate};
