//! Parser for the CLR (.NET) metadata embedded in Portable Executable
//! images, per ECMA-335.
//!
//! Given a PE image carrying a CLR header, [`ClrImage`] loads the CLR
//! directory, the metadata root, the heap streams (`#Strings`, `#US`,
//! `#GUID`, `#Blob`) and the tables stream (`#~`/`#-`), and exposes every
//! table row as a typed record whose references are resolved to
//! `(table, row)` pairs, coded-index targets, and run-list ranges.
//!
//! ```no_run
//! use cilmeta::ClrImage;
//!
//! let image = ClrImage::open("assembly.exe")?;
//! if let Some(tables) = image.tables() {
//!     for row in tables.type_def().unwrap_or_default() {
//!         println!("{:?}", image.strings().and_then(|s| s.get_str(row.type_name)));
//!     }
//! }
//! for warning in image.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! # Ok::<(), cilmeta::Error>(())
//! ```
//!
//! Parsing is one-shot and best-effort: recoverable defects are localized
//! to the smallest unit (row field, row, table, stream) and collected as
//! warnings, while truly malformed framing fails the construction.

mod error;
mod metadata;
mod pe_image;

pub use error::{Error, Result, Warnings};
pub use metadata::*;
pub use pe_image::{
    DataDirectories, DataDirectory, NtSpecificFields, PeHeader, PeImage, PeOptionalHeader,
    SectionHeader, StandardFields,
};
