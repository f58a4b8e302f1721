//! Schema-driven table extraction
//!
//! Tables are located by heading text, rows by label text, and every data
//! cell is converted under the row's [`crate::Converter`]. Nothing here fails:
//! missing pieces come back as empty lists or absent values.

mod assemble;
mod fields;
mod locate;
mod text;

pub use assemble::*;
pub use fields::*;
pub use locate::*;
pub use text::*;
