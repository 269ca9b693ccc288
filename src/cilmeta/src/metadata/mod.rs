mod cli_header;
mod compressed;
mod flags;
mod heaps;
mod image;
mod index;
mod kind;
mod resources;
mod root;
mod rows;
mod schema;
mod streams;
mod tables;

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

pub use cli_header::{CliHeader, RuntimeFlags};
pub use compressed::{encode_compressed_u32, read_compressed_i32, read_compressed_u32};
pub use flags::*;
pub use heaps::*;
pub use image::ClrImage;
pub use index::*;
pub use kind::TableKind;
pub use resources::ClrResource;
pub use root::{MetadataRoot, METADATA_SIGNATURE};
pub use rows::*;
pub use schema::{FieldKind, HeapSizes, TableDecodeContext};
pub use streams::*;
pub use tables::{MetadataTable, MetadataTables, Table, TablesHeader};

pub(crate) type Buffer<'a> = Cursor<&'a [u8]>;
