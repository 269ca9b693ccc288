
use crate::error::Warnings;
use crate::pe_image::PeImage;

use super::*;

/// One manifest resource, as described by a `ManifestResource` row plus the
/// CLR header's Resources directory.
///
/// For resources stored in this image, `data` holds the payload bytes (the
/// directory stores a dword size prefix at `Offset` followed by the data).
/// Resources living in another file or assembly carry only their
/// `implementation` reference. Payload deserialization is left to callers.
pub struct ClrResource {
    pub name: Option<String>,
    pub flags: ManifestResourceAttributes,
    /// Offset from the Resources directory base, as stored on the row.
    pub offset: u32,
    /// Reference to the `File`/`AssemblyRef`/`ExportedType` row holding the
    /// resource; `None` when the resource lives in the current image.
    pub implementation: Option<TableIndex>,
    /// RVA of the size-prefixed payload, for in-image resources.
    pub rva: Option<u32>,
    pub data: Option<Vec<u8>>,
}

impl ClrResource {
    pub fn is_public(&self) -> bool {
        self.flags.is_public()
    }

    pub fn is_private(&self) -> bool {
        self.flags.is_private()
    }
}

/// Build resource descriptors from the `ManifestResource` table. Payloads
/// are sliced out of the image for rows whose implementation is "this
/// assembly"; dangling offsets degrade to a descriptor without data.
pub(crate) fn read_resources(
    pe: &PeImage,
    clr_header: &CliHeader,
    tables: Option<&MetadataTables>,
    strings: Option<&StringsHeap>,
    warnings: &mut Warnings,
) -> Vec<ClrResource> {
    let Some(rows) = tables.and_then(|tables| tables.manifest_resource()) else {
        return Vec::new();
    };

    let base = clr_header.resources;
    let mut resources = Vec::with_capacity(rows.len());

    for row in rows {
        let name = strings.and_then(|heap| heap.get_str(row.name));
        let implementation = row.implementation.target();

        let mut rva = None;
        let mut data = None;
        if implementation.is_none() {
            if base.rva == 0 {
                warnings.warn(format!(
                    "resource {:?} has no implementation and the image has no resources directory",
                    name.as_deref().unwrap_or("")
                ));
            } else if row.offset >= base.size {
                warnings.warn(format!(
                    "resource {:?} offset 0x{:x} is outside the resources directory",
                    name.as_deref().unwrap_or(""),
                    row.offset
                ));
            } else {
                let item_rva = base.rva + row.offset;
                rva = Some(item_rva);
                match pe.dword_at_rva(item_rva) {
                    Some(size) => {
                        let bytes = pe.bytes_at_rva(item_rva + 4, size as usize);
                        if bytes.len() < size as usize {
                            warnings.warn(format!(
                                "resource {:?} data truncated: declared {} bytes, found {}",
                                name.as_deref().unwrap_or(""),
                                size,
                                bytes.len()
                            ));
                        }
                        data = Some(bytes.to_vec());
                    }
                    None => {
                        warnings.warn(format!(
                            "unable to read resource size at rva 0x{:08x}",
                            item_rva
                        ));
                    }
                }
            }
        }

        resources.push(ClrResource {
            name,
            flags: row.flags,
            offset: row.offset,
            implementation,
            rva,
            data,
        });
    }

    resources
}
