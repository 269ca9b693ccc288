
use crate::error::{Error, Result, Warnings};

use super::*;

/// Magic signature for physical metadata: "BSJB".
pub const METADATA_SIGNATURE: u32 = 0x424A5342;

/// # II.24.2.1 Metadata root
///
/// The root of the physical metadata starts with a magic signature, several
/// bytes of version and other miscellaneous information, followed by a count
/// and an array of stream headers, one for each stream that is present. The
/// actual encoded tables and heaps are stored in the streams, which
/// immediately follow this array of headers.
///
/// | Offset       | Size     | Field         | Description |
/// | ------------ | -------- | ------------- | ----------- |
/// | 0            | 4        | Signature     | Magic signature for physical metadata : `0x424A5342`. |
/// | 4            | 2        | MajorVersion  | Major version, 1 (ignore on read) |
/// | 6            | 2        | MinorVersion  | Minor version, 1 (ignore on read) |
/// | 8            | 4        | Reserved      | Reserved, always 0 (§II.24.1). |
/// | 12           | 4        | Length        | Number of bytes allocated to hold version string, rounded up to a multiple of four; call this *x*. |
/// | 16           | *x*      | Version       | UTF8-encoded null-terminated version string, padded to *x* bytes. |
/// | 16+*x*       | 2        | Flags         | Reserved, always 0 (§II.24.1). |
/// | 16+*x*+2     | 2        | Streams       | Number of streams, say *n*. |
/// | 16+*x*+4     | -        | StreamHeaders | Array of *n* [`StreamHeader`] structures. |
pub struct MetadataRoot {
    pub signature: u32,
    pub major_version: u16,
    pub minor_version: u16,
    pub reserved: u32,
    pub version_length: u32,
    /// The version string with its NUL padding trimmed.
    pub version: String,
    pub flags: u16,
    pub number_of_streams: u16,
    pub stream_headers: Vec<StreamHeader>,
    /// The RVA the root was read from; stream offsets are relative to it.
    pub rva: u32,
}

impl MetadataRoot {
    /// Parse the metadata root out of `data`. A bad signature or a header
    /// that cannot be framed is fatal; a truncated stream directory keeps
    /// the headers read so far and records a warning.
    pub fn parse(data: &[u8], rva: u32, warnings: &mut Warnings) -> Result<MetadataRoot> {
        if data.len() < 16 {
            return Err(Error::format(format!(
                "unable to read metadata root at rva 0x{:08x}",
                rva
            )));
        }

        let mut buffer = Buffer::new(data);
        let signature = buffer.read_u32::<LittleEndian>()?;
        if signature != METADATA_SIGNATURE {
            return Err(Error::format(format!(
                "invalid metadata signature: expected 0x{:08X}, got 0x{:08X}",
                METADATA_SIGNATURE, signature
            )));
        }

        let major_version = buffer.read_u16::<LittleEndian>()?;
        let minor_version = buffer.read_u16::<LittleEndian>()?;
        let reserved = buffer.read_u32::<LittleEndian>()?;
        let version_length = buffer.read_u32::<LittleEndian>()?;

        // The declared length already includes the padding to the next
        // 4-byte boundary. It is untrusted input; bound it before
        // allocating.
        if version_length as usize > data.len() {
            return Err(Error::format(format!(
                "unable to read {}-byte metadata version string",
                version_length
            )));
        }
        let mut version = vec![0u8; version_length as usize];
        buffer.read_exact(&mut version).map_err(|_| {
            Error::format(format!(
                "unable to read {}-byte metadata version string",
                version_length
            ))
        })?;
        while version.last() == Some(&0) {
            version.pop();
        }
        let version = String::from_utf8_lossy(&version).into_owned();

        let flags = buffer.read_u16::<LittleEndian>()?;
        let number_of_streams = buffer.read_u16::<LittleEndian>()?;

        let mut stream_headers = Vec::with_capacity(number_of_streams as usize);
        for i in 0..number_of_streams {
            match StreamHeader::read(&mut buffer) {
                Ok(header) => stream_headers.push(header),
                Err(_) => {
                    // assume this throws off further parsing, so stop
                    warnings.warn(format!("invalid stream header {}", i + 1));
                    break;
                }
            }
        }

        Ok(MetadataRoot {
            signature,
            major_version,
            minor_version,
            reserved,
            version_length,
            version,
            flags,
            number_of_streams,
            stream_headers,
            rva,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_bytes(version: &str, streams: &[(u32, u32, &str)]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&METADATA_SIGNATURE.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        let padded = (version.len() + 1 + 3) & !3;
        data.extend_from_slice(&(padded as u32).to_le_bytes());
        data.extend_from_slice(version.as_bytes());
        data.resize(16 + padded, 0);
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&(streams.len() as u16).to_le_bytes());
        for (offset, size, name) in streams {
            data.extend_from_slice(&offset.to_le_bytes());
            data.extend_from_slice(&size.to_le_bytes());
            data.extend_from_slice(name.as_bytes());
            let field_len = (name.len() & !3) + 4;
            let start = data.len() - name.len();
            data.resize(start + field_len, 0);
        }
        data
    }

    #[test]
    fn parses_root_and_directory() {
        let data = root_bytes("v4.0.30319", &[(0x6c, 0x100, "#~"), (0x16c, 0x80, "#Strings")]);
        let mut warnings = Warnings::new();
        let root = MetadataRoot::parse(&data, 0x2050, &mut warnings).unwrap();

        assert_eq!(root.signature, METADATA_SIGNATURE);
        assert_eq!(root.version, "v4.0.30319");
        assert_eq!(root.version_length, 12);
        assert_eq!(root.number_of_streams, 2);
        assert_eq!(root.stream_headers.len(), 2);
        assert_eq!(root.stream_headers[0].name, "#~");
        assert_eq!(root.stream_headers[1].offset, 0x16c);
        assert!(warnings.is_empty());
    }

    #[test]
    fn bad_signature_is_fatal() {
        let mut data = root_bytes("v4.0.30319", &[]);
        data[0] = 0x00;
        let mut warnings = Warnings::new();
        assert!(matches!(
            MetadataRoot::parse(&data, 0, &mut warnings),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[test]
    fn truncated_directory_keeps_read_headers() {
        let mut data = root_bytes("v2", &[(0x6c, 0x100, "#~"), (0x16c, 0x80, "#Strings")]);
        data.truncate(data.len() - 6);
        let mut warnings = Warnings::new();
        let root = MetadataRoot::parse(&data, 0, &mut warnings).unwrap();
        assert_eq!(root.stream_headers.len(), 1);
        assert!(!warnings.is_empty());
    }
}
