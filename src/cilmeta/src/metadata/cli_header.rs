
use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::pe_image::DataDirectory;

use super::MetadataToken;

/// # II.25.3.3 CLI header
///
/// The CLI header contains all of the runtime-specific data entries and other
/// information. The header should be placed in a read-only, sharable section
/// of the image. This header is defined as follows:
///
/// | Offset | Size | Field                     | Description |
/// | ------ | ---- | ------------------------- | ----------- |
/// | 0      | 4    | Cb                        | Size of the header in bytes |
/// | 4      | 2    | MajorRuntimeVersion       | The minimum version of the runtime required to run this program, currently 2. |
/// | 6      | 2    | MinorRuntimeVersion       | The minor portion of the version, currently 0. |
/// | 8      | 8    | MetaData                  | RVA and size of the physical metadata (§II.24). |
/// | 16     | 4    | Flags                     | Flags describing this runtime image ([`RuntimeFlags`]). |
/// | 20     | 4    | EntryPointToken           | Token for the *MethodDef* or *File* of the entry point for the image, or an RVA when `NATIVE_ENTRYPOINT` is set |
/// | 24     | 8    | Resources                 | RVA and size of implementation-specific resources. |
/// | 32     | 8    | StrongNameSignature       | RVA of the hash data for this PE file used by the CLI loader for binding and versioning |
/// | 40     | 8    | CodeManagerTable          | Always 0 (§II.24.1). |
/// | 48     | 8    | VTableFixups              | RVA of an array of locations in the file that contain an array of function pointers (e.g., vtable slots). |
/// | 56     | 8    | ExportAddressTableJumps   | Always 0 (§II.24.1). |
/// | 64     | 8    | ManagedNativeHeader       | Always 0 (§II.24.1). |
pub struct CliHeader {
    pub cb: u32,
    pub major_runtime_version: u16,
    pub minor_runtime_version: u16,
    pub metadata: DataDirectory,
    pub flags: RuntimeFlags,
    /// Raw dword: a metadata token, or a native RVA when the
    /// `NATIVE_ENTRYPOINT` flag is set.
    pub entry_point: u32,
    pub resources: DataDirectory,
    pub strong_name_signature: DataDirectory,
    pub code_manager_table: DataDirectory,
    pub vtable_fixups: DataDirectory,
    pub export_address_table_jumps: DataDirectory,
    pub managed_native_header: DataDirectory,
}

impl CliHeader {
    pub const SIZE: usize = 72;

    pub fn parse(data: &[u8]) -> Result<CliHeader> {
        if data.len() < Self::SIZE {
            return Err(Error::format(format!(
                "unable to read CLR header: expected {} bytes, got {}",
                Self::SIZE,
                data.len()
            )));
        }

        Ok(CliHeader {
            cb: u32::from_le_bytes(data[0..4].try_into().unwrap()),
            major_runtime_version: u16::from_le_bytes(data[4..6].try_into().unwrap()),
            minor_runtime_version: u16::from_le_bytes(data[6..8].try_into().unwrap()),
            metadata: DataDirectory::from_slice(&data[8..16]),
            flags: RuntimeFlags::from_bits_retain(u32::from_le_bytes(data[16..20].try_into().unwrap())),
            entry_point: u32::from_le_bytes(data[20..24].try_into().unwrap()),
            resources: DataDirectory::from_slice(&data[24..32]),
            strong_name_signature: DataDirectory::from_slice(&data[32..40]),
            code_manager_table: DataDirectory::from_slice(&data[40..48]),
            vtable_fixups: DataDirectory::from_slice(&data[48..56]),
            export_address_table_jumps: DataDirectory::from_slice(&data[56..64]),
            managed_native_header: DataDirectory::from_slice(&data[64..72]),
        })
    }

    /// The entry point as a metadata token, unless the image uses a native
    /// entry point or has none at all.
    pub fn entry_point_token(&self) -> Option<MetadataToken> {
        if self.entry_point == 0 || self.flags.contains(RuntimeFlags::NATIVE_ENTRYPOINT) {
            return None;
        }
        Some(MetadataToken(self.entry_point))
    }
}

bitflags! {
    /// # II.25.3.3.1 Runtime flags
    ///
    /// The following flags describe this runtime image and are used by the
    /// loader.
    ///
    /// | Flag                               | Value        | Description |
    /// | ---------------------------------- | ------------ | ----------- |
    /// | `COMIMAGE_FLAGS_ILONLY`            | `0x00000001` | Shall be 1. |
    /// | `COMIMAGE_FLAGS_32BITREQUIRED`     | `0x00000002` | Image can only be loaded into a 32-bit process. |
    /// | `COMIMAGE_FLAGS_STRONGNAMESIGNED`  | `0x00000008` | Image has a strong name signature. |
    /// | `COMIMAGE_FLAGS_NATIVE_ENTRYPOINT` | `0x00000010` | The EntryPoint dword is an RVA of native code, not a token. |
    /// | `COMIMAGE_FLAGS_TRACKDEBUGDATA`    | `0x00010000` | Should be 0 (§II.24.1). |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuntimeFlags: u32 {
        const ILONLY = 0x0000_0001;
        const BIT32_REQUIRED = 0x0000_0002;
        const IL_LIBRARY = 0x0000_0004;
        const STRONGNAMESIGNED = 0x0000_0008;
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        const TRACKDEBUGDATA = 0x0001_0000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TableKind;

    fn header_bytes(flags: u32, entry_point: u32) -> Vec<u8> {
        let mut data = vec![0u8; CliHeader::SIZE];
        data[0..4].copy_from_slice(&72u32.to_le_bytes());
        data[4..6].copy_from_slice(&2u16.to_le_bytes());
        data[6..8].copy_from_slice(&5u16.to_le_bytes());
        data[8..12].copy_from_slice(&0x2050u32.to_le_bytes());
        data[12..16].copy_from_slice(&0x500u32.to_le_bytes());
        data[16..20].copy_from_slice(&flags.to_le_bytes());
        data[20..24].copy_from_slice(&entry_point.to_le_bytes());
        data
    }

    #[test]
    fn parses_all_fields() {
        let header = CliHeader::parse(&header_bytes(0x1, 0x0600_0001)).unwrap();
        assert_eq!(header.cb, 72);
        assert_eq!(header.major_runtime_version, 2);
        assert_eq!(header.minor_runtime_version, 5);
        assert_eq!(header.metadata.rva, 0x2050);
        assert_eq!(header.metadata.size, 0x500);
        assert!(header.flags.contains(RuntimeFlags::ILONLY));

        let token = header.entry_point_token().unwrap();
        assert_eq!(token.table(), Some(TableKind::MethodDef));
        assert_eq!(token.rid(), 1);
    }

    #[test]
    fn native_entry_point_is_not_a_token() {
        let header = CliHeader::parse(&header_bytes(0x11, 0x1234)).unwrap();
        assert_eq!(header.entry_point, 0x1234);
        assert_eq!(header.entry_point_token(), None);
    }

    #[test]
    fn short_header_is_fatal() {
        assert!(CliHeader::parse(&[0u8; 40]).is_err());
    }
}
