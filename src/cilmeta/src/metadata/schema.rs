
use super::*;

/// # II.24.2.6 #~ stream
/// [...]
///
/// The HeapSizes field is a bitvector that encodes the width of indexes into
/// the various heaps. If bit 0 is set, indexes into the "#String" heap are 4
/// bytes wide; if bit 1 is set, indexes into the "#GUID" heap are 4 bytes
/// wide; if bit 2 is set, indexes into the "#Blob" heap are 4 bytes wide.
/// Conversely, if the HeapSize bit for a particular heap is not set, indexes
/// into that heap are 2 bytes wide.
///
/// | Heap size flag | Description |
/// | -------------- | ----------- |
/// | `0x01`         | Size of "#String" stream >= 2^16. |
/// | `0x02`         | Size of "#GUID" stream >= 2^16. |
/// | `0x04`         | Size of "#Blob" stream >= 2^16. |
/// | `0x20`         | The stream contains only changes made during an edit-and-continue session. |
/// | `0x40`         | The stream contains an extra 4-byte data item after the row counts. |
/// | `0x80`         | The stream may contain rows flagged as deleted. |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapSizes(u8);

impl HeapSizes {
    pub const STRING_FLAG: u8 = 0b0000_0001;
    pub const GUID_FLAG: u8 = 0b0000_0010;
    pub const BLOB_FLAG: u8 = 0b0000_0100;
    pub const DELTA_ONLY_FLAG: u8 = 0b0010_0000;
    pub const EXTRA_DATA_FLAG: u8 = 0b0100_0000;
    pub const HAS_DELETE_FLAG: u8 = 0b1000_0000;

    pub fn from(value: u8) -> HeapSizes {
        HeapSizes(value)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }

    pub fn string_size(&self) -> u8 {
        if self.check_flag(HeapSizes::STRING_FLAG) { 4 } else { 2 }
    }

    pub fn guid_size(&self) -> u8 {
        if self.check_flag(HeapSizes::GUID_FLAG) { 4 } else { 2 }
    }

    pub fn blob_size(&self) -> u8 {
        if self.check_flag(HeapSizes::BLOB_FLAG) { 4 } else { 2 }
    }

    pub fn delta_only(&self) -> bool {
        self.check_flag(HeapSizes::DELTA_ONLY_FLAG)
    }

    pub fn has_extra_data(&self) -> bool {
        self.check_flag(HeapSizes::EXTRA_DATA_FLAG)
    }

    pub fn has_delete(&self) -> bool {
        self.check_flag(HeapSizes::HAS_DELETE_FLAG)
    }

    pub fn check_flag(&self, flag: u8) -> bool {
        self.0 & flag == flag
    }
}

/// Everything needed to size and decode one row: the row-count vector from
/// the tables header, the heap offset widths, and the per-kind coded index
/// widths derived from both.
pub struct TableDecodeContext {
    row_counts: [u32; TableKind::MAX_TABLES],
    heap_sizes: HeapSizes,
    coded_index_sizes: [u8; 13],
}

impl TableDecodeContext {
    #[must_use]
    pub fn new(row_counts: [u32; TableKind::MAX_TABLES], heap_sizes: HeapSizes) -> Self {
        let mut coded_index_sizes = [0u8; 13];
        for (slot, tag) in coded_index_sizes.iter_mut().zip(CodedIndexTag::iter()) {
            *slot = if tag.is_big_index(|kind| row_counts[kind.number() as usize]) {
                4
            } else {
                2
            };
        }

        Self {
            row_counts,
            heap_sizes,
            coded_index_sizes,
        }
    }

    pub fn row_count(&self, kind: TableKind) -> u32 {
        self.row_counts[kind.number() as usize]
    }

    /// # II.24.2.6 #~ stream
    ///
    /// [...]
    ///
    /// * If *e* is a simple index into a table with index *i*, it is stored using
    ///   2 bytes if table *i* has less than 2<sup>16</sup> rows, otherwise it is
    ///   stored using 4 bytes.
    pub fn table_index_size(&self, kind: TableKind) -> u8 {
        if self.row_count(kind) <= 1 << 16 {
            2
        } else {
            4
        }
    }

    pub fn coded_index_size(&self, tag: CodedIndexTag) -> u8 {
        let slot = CodedIndexTag::iter().position(|t| *t == tag).unwrap_or(0);
        self.coded_index_sizes[slot]
    }

    pub fn string_index_size(&self) -> u8 {
        self.heap_sizes.string_size()
    }

    pub fn guid_index_size(&self) -> u8 {
        self.heap_sizes.guid_size()
    }

    pub fn blob_index_size(&self) -> u8 {
        self.heap_sizes.blob_size()
    }
}

/// The field-kind alphabet every row schema is written in.
///
/// One `&'static [FieldKind]` per table describes the wire layout; the typed
/// readers in `rows.rs` must consume exactly the bytes this layout adds up
/// to (covered by a test below).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    /// Offset into the `#Strings` heap.
    String,
    /// 1-based slot in the `#GUID` heap.
    Guid,
    /// Offset into the `#Blob` heap.
    Blob,
    /// Simple 1-based index into one table.
    Index(TableKind),
    /// Bit-packed reference into a candidate set of tables.
    Coded(CodedIndexTag),
    /// Start of a contiguous run of child rows; stored as a simple index.
    RunList(TableKind),
}

impl FieldKind {
    pub fn width(&self, context: &TableDecodeContext) -> u32 {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 => 8,
            FieldKind::String => context.string_index_size() as u32,
            FieldKind::Guid => context.guid_index_size() as u32,
            FieldKind::Blob => context.blob_index_size() as u32,
            FieldKind::Index(kind) | FieldKind::RunList(kind) => {
                context.table_index_size(*kind) as u32
            }
            FieldKind::Coded(tag) => context.coded_index_size(*tag) as u32,
        }
    }
}

impl TableKind {
    /// The row schema as a wire-layout description, per ECMA-335 II.22.
    /// The reserved slots 62/63 have none.
    pub fn layout(&self) -> Option<&'static [FieldKind]> {
        use CodedIndexTag::*;
        use FieldKind::*;

        Some(match self {
            TableKind::Module => &[U16, String, Guid, Guid, Guid],
            TableKind::TypeRef => &[Coded(ResolutionScope), String, String],
            TableKind::TypeDef => &[
                U32,
                String,
                String,
                Coded(TypeDefOrRef),
                RunList(TableKind::Field),
                RunList(TableKind::MethodDef),
            ],
            TableKind::FieldPtr => &[Index(TableKind::Field)],
            TableKind::Field => &[U16, String, Blob],
            TableKind::MethodPtr => &[Index(TableKind::MethodDef)],
            TableKind::MethodDef => &[U32, U16, U16, String, Blob, RunList(TableKind::Param)],
            TableKind::ParamPtr => &[Index(TableKind::Param)],
            TableKind::Param => &[U16, U16, String],
            TableKind::InterfaceImpl => &[Index(TableKind::TypeDef), Coded(TypeDefOrRef)],
            TableKind::MemberRef => &[Coded(MemberRefParent), String, Blob],
            TableKind::Constant => &[U8, U8, Coded(HasConstant), Blob],
            TableKind::CustomAttribute => {
                &[Coded(HasCustomAttribute), Coded(CustomAttributeType), Blob]
            }
            TableKind::FieldMarshal => &[Coded(HasFieldMarshal), Blob],
            TableKind::DeclSecurity => &[U16, Coded(HasDeclSecurity), Blob],
            TableKind::ClassLayout => &[U16, U32, Index(TableKind::TypeDef)],
            TableKind::FieldLayout => &[U32, Index(TableKind::Field)],
            TableKind::StandAloneSig => &[Blob],
            TableKind::EventMap => &[Index(TableKind::TypeDef), RunList(TableKind::Event)],
            TableKind::EventPtr => &[Index(TableKind::Event)],
            TableKind::Event => &[U16, String, Coded(TypeDefOrRef)],
            TableKind::PropertyMap => &[Index(TableKind::TypeDef), RunList(TableKind::Property)],
            TableKind::PropertyPtr => &[Index(TableKind::Property)],
            TableKind::Property => &[U16, String, Blob],
            TableKind::MethodSemantics => {
                &[U16, Index(TableKind::MethodDef), Coded(HasSemantics)]
            }
            TableKind::MethodImpl => &[
                Index(TableKind::TypeDef),
                Coded(MethodDefOrRef),
                Coded(MethodDefOrRef),
            ],
            TableKind::ModuleRef => &[String],
            TableKind::TypeSpec => &[Blob],
            TableKind::ImplMap => &[
                U16,
                Coded(MemberForwarded),
                String,
                Index(TableKind::ModuleRef),
            ],
            TableKind::FieldRva => &[U32, Index(TableKind::Field)],
            TableKind::EncLog => &[U32, U32],
            TableKind::EncMap => &[U32],
            TableKind::Assembly => &[U32, U16, U16, U16, U16, U32, Blob, String, String],
            TableKind::AssemblyProcessor => &[U32],
            TableKind::AssemblyOS => &[U32, U32, U32],
            TableKind::AssemblyRef => &[U16, U16, U16, U16, U32, Blob, String, String, Blob],
            TableKind::AssemblyRefProcessor => &[U32, Index(TableKind::AssemblyRef)],
            TableKind::AssemblyRefOS => &[U32, U32, U32, Index(TableKind::AssemblyRef)],
            TableKind::File => &[U32, String, Blob],
            TableKind::ExportedType => &[U32, U32, String, String, Coded(Implementation)],
            TableKind::ManifestResource => &[U32, U32, String, Coded(Implementation)],
            TableKind::NestedClass => &[Index(TableKind::TypeDef), Index(TableKind::TypeDef)],
            TableKind::GenericParam => &[U16, U16, Coded(TypeOrMethodDef), String],
            TableKind::MethodSpec => &[Coded(MethodDefOrRef), Blob],
            TableKind::GenericParamConstraint => {
                &[Index(TableKind::GenericParam), Coded(TypeDefOrRef)]
            }
            TableKind::Unused | TableKind::MaxTable => return None,
        })
    }

    /// On-disk size of one row, in bytes; `None` when the table has no
    /// schema.
    pub fn row_size(&self, context: &TableDecodeContext) -> Option<u32> {
        let layout = self.layout()?;
        Some(layout.iter().map(|field| field.width(context)).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_context() -> TableDecodeContext {
        TableDecodeContext::new([0; TableKind::MAX_TABLES], HeapSizes::from(0))
    }

    #[test]
    fn all_small_row_sizes() {
        let context = small_context();
        // every index narrow: Module = 2 + 2 + 2*3
        assert_eq!(TableKind::Module.row_size(&context), Some(10));
        assert_eq!(TableKind::TypeRef.row_size(&context), Some(6));
        assert_eq!(TableKind::TypeDef.row_size(&context), Some(14));
        assert_eq!(TableKind::MethodDef.row_size(&context), Some(14));
        assert_eq!(TableKind::Constant.row_size(&context), Some(6));
        assert_eq!(TableKind::Assembly.row_size(&context), Some(22));
        assert_eq!(TableKind::EncLog.row_size(&context), Some(8));
        assert_eq!(TableKind::Unused.row_size(&context), None);
        assert_eq!(TableKind::MaxTable.row_size(&context), None);
    }

    #[test]
    fn wide_heap_offsets() {
        let context = TableDecodeContext::new(
            [0; TableKind::MAX_TABLES],
            HeapSizes::from(HeapSizes::STRING_FLAG | HeapSizes::BLOB_FLAG),
        );
        // Field: u16 flags + 4-byte string + 4-byte blob
        assert_eq!(TableKind::Field.row_size(&context), Some(10));
        // Module keeps 2-byte guid offsets
        assert_eq!(TableKind::Module.row_size(&context), Some(12));
    }

    /// A table crossing 2^14 rows promotes every 2-bit coded index over it
    /// to 4 bytes, and the dependent row sizes grow accordingly.
    #[test]
    fn coded_index_width_promotion() {
        let mut row_counts = [0u32; TableKind::MAX_TABLES];
        row_counts[TableKind::TypeRef.number() as usize] = (1 << 14) + 1;
        let context = TableDecodeContext::new(row_counts, HeapSizes::from(0));

        assert_eq!(context.coded_index_size(CodedIndexTag::TypeDefOrRef), 4);
        assert_eq!(context.coded_index_size(CodedIndexTag::ResolutionScope), 4);
        assert_eq!(context.coded_index_size(CodedIndexTag::HasConstant), 2);
        // TypeDef row gains two bytes for its Extends column.
        assert_eq!(TableKind::TypeDef.row_size(&context), Some(16));
        // TypeRef itself is still indexed with 2 bytes (simple index).
        assert_eq!(context.table_index_size(TableKind::TypeRef), 2);
    }

    #[test]
    fn simple_index_width_boundary() {
        let mut row_counts = [0u32; TableKind::MAX_TABLES];
        row_counts[TableKind::Field.number() as usize] = 1 << 16;
        let context = TableDecodeContext::new(row_counts, HeapSizes::from(0));
        assert_eq!(context.table_index_size(TableKind::Field), 2);

        row_counts[TableKind::Field.number() as usize] = (1 << 16) + 1;
        let context = TableDecodeContext::new(row_counts, HeapSizes::from(0));
        assert_eq!(context.table_index_size(TableKind::Field), 4);
    }
}
