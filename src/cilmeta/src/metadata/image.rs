
use std::path::Path;

use crate::error::{Error, Result, Warnings};
use crate::pe_image::PeImage;

use super::*;

/// The parsed CLR view of one PE image.
///
/// Construction is one-shot: the facade owns every heap buffer and every
/// decoded row, holds no reference back to the source image, and is never
/// mutated afterwards. Non-fatal defects encountered anywhere during the
/// parse are collected on [`warnings`](ClrImage::warnings).
pub struct ClrImage {
    /// The 17-field CLR directory entry.
    pub clr_header: CliHeader,
    /// The metadata root; `None` when the root could not be parsed (a
    /// warning says why).
    pub metadata: Option<MetadataRoot>,
    /// All streams of the metadata root, in directory order.
    pub streams: Streams,
    resources: Vec<ClrResource>,
    warnings: Warnings,
}

impl ClrImage {
    pub fn open(path: impl AsRef<Path>) -> Result<ClrImage> {
        let pe = PeImage::open(path)?;
        ClrImage::from_pe(&pe)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<ClrImage> {
        let pe = PeImage::from_bytes(data)?;
        ClrImage::from_pe(&pe)
    }

    /// Parse the CLR directory, metadata root, streams and tables out of a
    /// PE image.
    ///
    /// Fails with [`Error::NotDotNet`] when the image has no CLR directory
    /// and with [`Error::InvalidFormat`] when the CLR header or metadata
    /// root cannot be framed at all. Everything below that is best-effort:
    /// tables and streams that cannot be decoded are skipped with warnings,
    /// and the remainder stays accessible.
    pub fn from_pe(pe: &PeImage) -> Result<ClrImage> {
        let directory = pe.clr_directory().ok_or(Error::NotDotNet)?;
        let clr_header = CliHeader::parse(pe.bytes_at_rva(directory.rva, CliHeader::SIZE))?;

        let mut warnings = Warnings::new();
        let metadata_rva = clr_header.metadata.rva;
        let root_data = pe.bytes_at_rva(metadata_rva, clr_header.metadata.size as usize);
        let metadata = MetadataRoot::parse(root_data, metadata_rva, &mut warnings)?;

        let mut streams = Streams::new();
        let mut seen_names: Vec<&str> = Vec::new();
        for header in &metadata.stream_headers {
            if seen_names.contains(&header.name.as_str()) {
                warnings.warn(format!("duplicate stream name '{}'", header.name));
            } else {
                seen_names.push(&header.name);
            }

            let stream_rva = metadata_rva + header.offset;
            let data = pe.bytes_at_rva(stream_rva, header.size as usize);
            if data.len() < header.size as usize {
                warnings.warn(format!(
                    "stream '{}' truncated: declared {} bytes, found {}",
                    header.name,
                    header.size,
                    data.len()
                ));
            }

            let stream = Stream::from_named(&header.name, data.to_vec(), stream_rva, &mut warnings);
            streams.push(header.clone(), stream);
        }

        let resources = super::resources::read_resources(
            pe,
            &clr_header,
            streams.tables(),
            streams.strings(),
            &mut warnings,
        );

        Ok(ClrImage {
            clr_header,
            metadata: Some(metadata),
            streams,
            resources,
            warnings,
        })
    }

    /// The `#Strings` heap; the last one wins when duplicated.
    pub fn strings(&self) -> Option<&StringsHeap> {
        self.streams.strings()
    }

    /// The `#US` heap; the last one wins when duplicated.
    pub fn user_strings(&self) -> Option<&UserStringHeap> {
        self.streams.user_strings()
    }

    /// The `#GUID` heap; the last one wins when duplicated.
    pub fn guids(&self) -> Option<&GuidHeap> {
        self.streams.guids()
    }

    /// The `#Blob` heap; the last one wins when duplicated.
    pub fn blobs(&self) -> Option<&BlobHeap> {
        self.streams.blobs()
    }

    /// The decoded metadata tables (`#~`/`#-` stream).
    pub fn tables(&self) -> Option<&MetadataTables> {
        self.streams.tables()
    }

    /// A stream by directory name; the last one wins when duplicated.
    pub fn stream(&self, name: &str) -> Option<&Stream> {
        self.streams.get(name)
    }

    /// Manifest resource descriptors; payload bytes are attached for
    /// resources stored in this image.
    pub fn resources(&self) -> &[ClrResource] {
        &self.resources
    }

    /// Best-effort parse warnings, in encounter order.
    pub fn warnings(&self) -> &[String] {
        self.warnings.as_slice()
    }
}
