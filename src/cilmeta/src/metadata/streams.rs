
use crate::error::{Result, Warnings};

use super::*;

/// # II.24.2.2 Stream header
///
/// A stream header gives the names, and the position and length of a
/// particular table or heap. Note that the length of a Stream header
/// structure is not fixed, but depends on the length of its name field (a
/// variable length null-terminated string).
///
/// | Offset | Size | Field  | Description |
/// | ------ | ---- | ------ | ----------- |
/// | 0      | 4    | Offset | Memory offset to start of this stream from start of the metadata root |
/// | 4      | 4    | Size   | Size of this stream in bytes, shall be a multiple of 4. |
/// | 8      | -    | Name   | Name of the stream as null-terminated variable length array of ASCII characters, padded to the next 4-byte boundary with `\0` characters. The name is limited to 32 characters. |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    pub offset: u32,
    pub size: u32,
    pub name: String,
}

impl StreamHeader {
    pub fn read(buffer: &mut Buffer) -> Result<StreamHeader> {
        let offset = buffer.read_u32::<LittleEndian>()?;
        let size = buffer.read_u32::<LittleEndian>()?;

        let mut name = Vec::new();
        loop {
            let byte = buffer.read_u8()?;
            if byte == 0 {
                break;
            }
            name.push(byte);
        }

        // The name field occupies the name, its terminator, and padding up
        // to the next 4-byte boundary.
        let field_len = (name.len() & !3) + 4;
        for _ in name.len() + 1..field_len {
            buffer.read_u8()?;
        }

        Ok(StreamHeader {
            offset,
            size,
            name: String::from_utf8_lossy(&name).into_owned(),
        })
    }
}

/// A stream with no recognized name, preserved verbatim.
pub struct GenericStream {
    pub name: String,
    pub rva: u32,
    pub data: Vec<u8>,
}

/// One parsed stream of the metadata root.
///
/// There are five recognized kinds of streams by name: `#~` or `#-`
/// (tables), `#Strings`, `#US` (user strings), `#GUID`, and `#Blob`. Any
/// other name is preserved as a [`GenericStream`].
pub enum Stream {
    Strings(StringsHeap),
    UserStrings(UserStringHeap),
    Guids(GuidHeap),
    Blobs(BlobHeap),
    Tables(MetadataTables),
    Generic(GenericStream),
}

impl Stream {
    /// Construct the typed stream for `name`. A tables stream whose header
    /// cannot be framed degrades to a generic stream with a warning, so the
    /// raw bytes stay reachable.
    pub fn from_named(name: &str, data: Vec<u8>, rva: u32, warnings: &mut Warnings) -> Stream {
        match name {
            "#Strings" => Stream::Strings(StringsHeap::new(data, rva)),
            "#US" => Stream::UserStrings(UserStringHeap::new(data, rva)),
            "#GUID" => Stream::Guids(GuidHeap::new(data, rva)),
            "#Blob" => Stream::Blobs(BlobHeap::new(data, rva)),
            "#~" | "#-" => match MetadataTables::parse(&data, rva, warnings) {
                Ok(tables) => Stream::Tables(tables),
                Err(e) => {
                    warnings.warn(format!("unable to parse stream {}: {}", name, e));
                    Stream::Generic(GenericStream {
                        name: name.to_string(),
                        rva,
                        data,
                    })
                }
            },
            _ => {
                log::debug!("unrecognized stream name {:?}", name);
                Stream::Generic(GenericStream {
                    name: name.to_string(),
                    rva,
                    data,
                })
            }
        }
    }
}

pub struct StreamEntry {
    pub header: StreamHeader,
    pub stream: Stream,
}

/// The streams of one metadata root, in directory order.
///
/// Lookups by name resolve duplicates to the **last** stream with that
/// name, matching the runtime; the full list stays available for callers
/// that care about the rest.
#[derive(Default)]
pub struct Streams {
    entries: Vec<StreamEntry>,
}

impl Streams {
    pub fn new() -> Streams {
        Streams::default()
    }

    pub fn push(&mut self, header: StreamHeader, stream: Stream) {
        self.entries.push(StreamEntry { header, stream });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StreamEntry> {
        self.entries.iter()
    }

    /// The last stream with the given directory name.
    pub fn get(&self, name: &str) -> Option<&Stream> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.header.name == name)
            .map(|entry| &entry.stream)
    }

    pub fn strings(&self) -> Option<&StringsHeap> {
        self.entries.iter().rev().find_map(|entry| match &entry.stream {
            Stream::Strings(heap) => Some(heap),
            _ => None,
        })
    }

    pub fn user_strings(&self) -> Option<&UserStringHeap> {
        self.entries.iter().rev().find_map(|entry| match &entry.stream {
            Stream::UserStrings(heap) => Some(heap),
            _ => None,
        })
    }

    pub fn guids(&self) -> Option<&GuidHeap> {
        self.entries.iter().rev().find_map(|entry| match &entry.stream {
            Stream::Guids(heap) => Some(heap),
            _ => None,
        })
    }

    pub fn blobs(&self) -> Option<&BlobHeap> {
        self.entries.iter().rev().find_map(|entry| match &entry.stream {
            Stream::Blobs(heap) => Some(heap),
            _ => None,
        })
    }

    pub fn tables(&self) -> Option<&MetadataTables> {
        self.entries.iter().rev().find_map(|entry| match &entry.stream {
            Stream::Tables(tables) => Some(tables),
            _ => None,
        })
    }
}
