//! Character primitives and generic combinators built on top of [`crate::parser`].
//!
//! - [`char`] — `satisfy`, `char_`, `string_`, the digit/letter classes,
//!   `one_of`, `none_of`, `eol`.
//! - [`multi`] — `many`, `some`, `sep_by` and its relatives, `between`,
//!   `choice`, `option`, `optional`, `many_till`, `count`, `skip_many`,
//!   `skip_some`.
//!
//! The four-continuation primitives themselves (`bind`, `alt`, `try_`,
//! `label`, ...) live in [`crate::parser`]; this module only adds the layer
//! built *on* them.

pub mod char;
pub mod multi;
