
use std::slice::Iter;

use super::*;

macro_rules! define_heap_index {
    ($name:ident, $size_fn:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// # II.24.2.6 #~ stream
            ///
            /// [...]
            ///
            /// * If e is an index into the GUID heap, 'blob', or String heap, it is
            ///   stored using the number of bytes as defined in the HeapSizes field.
            pub fn read(buffer: &mut Buffer, context: &TableDecodeContext) -> Result<$name, std::io::Error> {
                if context.$size_fn() == 4 {
                    Ok($name(buffer.read_u32::<LittleEndian>()?))
                } else {
                    Ok($name(buffer.read_u16::<LittleEndian>()? as u32))
                }
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }

        impl From<u16> for $name {
            fn from(value: u16) -> Self {
                $name(value as u32)
            }
        }
    };
}

define_heap_index!(StringIndex, string_index_size);
define_heap_index!(GuidIndex, guid_index_size);
define_heap_index!(BlobIndex, blob_index_size);

/// A simple index into one metadata table.
///
/// Row numbers are 1-based on the wire; `row == 0` means "no reference".
/// The raw row number is kept even when it is out of range for the target
/// table; resolution through [`MetadataTables::row`](super::MetadataTables::row)
/// yields `None` for such dangling references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableIndex {
    pub table: TableKind,
    pub row: u32,
}

impl TableIndex {
    pub fn new(table: TableKind, row: u32) -> TableIndex {
        TableIndex { table, row }
    }

    pub fn is_none(&self) -> bool {
        self.row == 0
    }

    /// # II.24.2.6 #~ stream
    ///
    /// [...]
    ///
    /// * If *e* is a simple index into a table with index *i*, it is stored using
    ///   2 bytes if table *i* has less than 2<sup>16</sup> rows, otherwise it is
    ///   stored using 4 bytes.
    pub fn read(buffer: &mut Buffer, table: TableKind, context: &TableDecodeContext) -> Result<TableIndex, std::io::Error> {
        let row = if context.table_index_size(table) == 4 {
            buffer.read_u32::<LittleEndian>()?
        } else {
            buffer.read_u16::<LittleEndian>()? as u32
        };
        Ok(TableIndex { table, row })
    }

    pub fn token(&self) -> MetadataToken {
        MetadataToken::from_parts(self.table.number(), self.row)
    }
}

/// # II.24.2.6 #~ stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodedIndexTag {
    /// | TypeDefOrRef: 2 bits to encode tag | Tag |
    /// | ---------------------------------- | --- |
    /// | `TypeDef`                          | 0   |
    /// | `TypeRef`                          | 1   |
    /// | `TypeSpec`                         | 2   |
    TypeDefOrRef,
    /// | HasConstant: 2 bits to encode tag | Tag |
    /// | --------------------------------- | --- |
    /// | `Field`                           | 0   |
    /// | `Param`                           | 1   |
    /// | `Property`                        | 2   |
    HasConstant,
    /// | HasCustomAttribute: 5 bits to encode tag | Tag |
    /// | ---------------------------------------- | --- |
    /// | `MethodDef`                              | 0   |
    /// | `Field`                                  | 1   |
    /// | `TypeRef`                                | 2   |
    /// | `TypeDef`                                | 3   |
    /// | `Param`                                  | 4   |
    /// | `InterfaceImpl`                          | 5   |
    /// | `MemberRef`                              | 6   |
    /// | `Module`                                 | 7   |
    /// | `DeclSecurity`                           | 8   |
    /// | `Property`                               | 9   |
    /// | `Event`                                  | 10  |
    /// | `StandAloneSig`                          | 11  |
    /// | `ModuleRef`                              | 12  |
    /// | `TypeSpec`                               | 13  |
    /// | `Assembly`                               | 14  |
    /// | `AssemblyRef`                            | 15  |
    /// | `File`                                   | 16  |
    /// | `ExportedType`                           | 17  |
    /// | `ManifestResource`                       | 18  |
    /// | `GenericParam`                           | 19  |
    /// | `GenericParamConstraint`                 | 20  |
    HasCustomAttribute,
    /// | HasFieldMarshall: 1 bit to encode tag | Tag |
    /// | ------------------------------------- | --- |
    /// | `Field`                               | 0   |
    /// | `Param`                               | 1   |
    HasFieldMarshal,
    /// | HasDeclSecurity: 2 bits to encode tag | Tag |
    /// | ------------------------------------- | --- |
    /// | `TypeDef`                             | 0   |
    /// | `MethodDef`                           | 1   |
    /// | `Assembly`                            | 2   |
    HasDeclSecurity,
    /// | MemberRefParent: 3 bits to encode tag | Tag |
    /// | ------------------------------------- | --- |
    /// | `TypeDef`                             | 0   |
    /// | `TypeRef`                             | 1   |
    /// | `ModuleRef`                           | 2   |
    /// | `MethodDef`                           | 3   |
    /// | `TypeSpec`                            | 4   |
    MemberRefParent,
    /// | HasSemantics: 1 bit to encode tag | Tag |
    /// | --------------------------------- | --- |
    /// | `Event`                           | 0   |
    /// | `Property`                        | 1   |
    HasSemantics,
    /// | MethodDefOrRef: 1 bit to encode tag | Tag |
    /// | ----------------------------------- | --- |
    /// | `MethodDef`                         | 0   |
    /// | `MemberRef`                         | 1   |
    MethodDefOrRef,
    /// | MemberForwarded: 1 bit to encode tag | Tag |
    /// | ------------------------------------ | --- |
    /// | `Field`                              | 0   |
    /// | `MethodDef`                          | 1   |
    MemberForwarded,
    /// | Implementation: 2 bits to encode tag | Tag |
    /// | ------------------------------------ | --- |
    /// | `File`                               | 0   |
    /// | `AssemblyRef`                        | 1   |
    /// | `ExportedType`                       | 2   |
    Implementation,
    /// | CustomAttributeType: 3 bits to encode tag | Tag |
    /// | ----------------------------------------- | --- |
    /// | `NotUsed`                                 | 0   |
    /// | `NotUsed`                                 | 1   |
    /// | `MethodDef`                               | 2   |
    /// | `MemberRef`                               | 3   |
    /// | `NotUsed`                                 | 4   |
    CustomAttributeType,
    /// | ResolutionScope: 2 bits to encode tag | Tag |
    /// | ------------------------------------- | --- |
    /// | `Module`                              | 0   |
    /// | `ModuleRef`                           | 1   |
    /// | `AssemblyRef`                         | 2   |
    /// | `TypeRef`                             | 3   |
    ResolutionScope,
    /// | TypeOrMethodDef: 1 bit to encode tag | Tag |
    /// | ------------------------------------ | --- |
    /// | `TypeDef`                            | 0   |
    /// | `MethodDef`                          | 1   |
    TypeOrMethodDef,
}

impl CodedIndexTag {
    pub fn tag_bits(&self) -> u32 {
        match self {
            CodedIndexTag::TypeDefOrRef => 2,
            CodedIndexTag::HasConstant => 2,
            CodedIndexTag::HasCustomAttribute => 5,
            CodedIndexTag::HasFieldMarshal => 1,
            CodedIndexTag::HasDeclSecurity => 2,
            CodedIndexTag::MemberRefParent => 3,
            CodedIndexTag::HasSemantics => 1,
            CodedIndexTag::MethodDefOrRef => 1,
            CodedIndexTag::MemberForwarded => 1,
            CodedIndexTag::Implementation => 2,
            CodedIndexTag::CustomAttributeType => 3,
            CodedIndexTag::ResolutionScope => 2,
            CodedIndexTag::TypeOrMethodDef => 1,
        }
    }

    /// The candidate tables in tag order. Reserved slots are
    /// [`TableKind::Unused`]; a reference selecting one decodes to "none"
    /// with its raw value preserved.
    pub fn candidate_tables(&self) -> &'static [TableKind] {
        use TableKind::*;
        match self {
            CodedIndexTag::TypeDefOrRef => &[TypeDef, TypeRef, TypeSpec],
            CodedIndexTag::HasConstant => &[Field, Param, Property],
            CodedIndexTag::HasCustomAttribute => &[
                MethodDef, Field, TypeRef, TypeDef, Param, InterfaceImpl, MemberRef,
                Module, DeclSecurity, Property, Event, StandAloneSig, ModuleRef,
                TypeSpec, Assembly, AssemblyRef, File, ExportedType, ManifestResource,
                GenericParam, GenericParamConstraint,
            ],
            CodedIndexTag::HasFieldMarshal => &[Field, Param],
            CodedIndexTag::HasDeclSecurity => &[TypeDef, MethodDef, Assembly],
            CodedIndexTag::MemberRefParent => &[TypeDef, TypeRef, ModuleRef, MethodDef, TypeSpec],
            CodedIndexTag::HasSemantics => &[Event, Property],
            CodedIndexTag::MethodDefOrRef => &[MethodDef, MemberRef],
            CodedIndexTag::MemberForwarded => &[Field, MethodDef],
            CodedIndexTag::Implementation => &[File, AssemblyRef, ExportedType],
            CodedIndexTag::CustomAttributeType => &[Unused, Unused, MethodDef, MemberRef, Unused],
            CodedIndexTag::ResolutionScope => &[Module, ModuleRef, AssemblyRef, TypeRef],
            CodedIndexTag::TypeOrMethodDef => &[TypeDef, MethodDef],
        }
    }

    /// # II.24.2.6 #~ stream
    ///
    /// [...]
    ///
    /// * If *e* is a *coded index* that points into table *t<sub>i</sub>* out of *n*
    ///   possible tables *t<sub>0</sub>*, ...*t<sub>n-1</sub>*, then it is stored as
    ///   e << (log n) | tag{*t<sub>0</sub>*, ...*t<sub>n-1</sub>*}\[*t<sub>i</sub>*]
    ///   using 2 bytes if the maximum number of rows of tables *t<sub>0</sub>*,
    ///   ...*t<sub>n-1</sub>*, is less than 2<sup>(16 – (log n))</sup>, and using
    ///   4 bytes otherwise.
    pub fn is_big_index(&self, row_count: impl Fn(TableKind) -> u32) -> bool {
        let max = self
            .candidate_tables()
            .iter()
            .filter(|kind| **kind != TableKind::Unused)
            .map(|kind| row_count(*kind))
            .max()
            .unwrap_or(0);
        max > 1u32 << (16 - self.tag_bits())
    }

    /// Split a raw coded value into its candidate table and 1-based row.
    ///
    /// A tag beyond the candidate list or naming a reserved slot yields no
    /// table; the raw value stays on the returned reference.
    pub fn decode(&self, raw: u32) -> CodedIndex {
        let bits = self.tag_bits();
        let tag = raw & ((1 << bits) - 1);
        let table = match self.candidate_tables().get(tag as usize) {
            Some(TableKind::Unused) | None => None,
            Some(kind) => Some(*kind),
        };
        CodedIndex {
            tag: *self,
            raw,
            table,
            row: raw >> bits,
        }
    }

    pub fn read(&self, buffer: &mut Buffer, context: &TableDecodeContext) -> Result<CodedIndex, std::io::Error> {
        let raw = if context.coded_index_size(*self) == 4 {
            buffer.read_u32::<LittleEndian>()?
        } else {
            buffer.read_u16::<LittleEndian>()? as u32
        };
        Ok(self.decode(raw))
    }

    pub fn iter() -> Iter<'static, CodedIndexTag> {
        static ALL: [CodedIndexTag; 13] = [
            CodedIndexTag::TypeDefOrRef,
            CodedIndexTag::HasConstant,
            CodedIndexTag::HasCustomAttribute,
            CodedIndexTag::HasFieldMarshal,
            CodedIndexTag::HasDeclSecurity,
            CodedIndexTag::MemberRefParent,
            CodedIndexTag::HasSemantics,
            CodedIndexTag::MethodDefOrRef,
            CodedIndexTag::MemberForwarded,
            CodedIndexTag::Implementation,
            CodedIndexTag::CustomAttributeType,
            CodedIndexTag::ResolutionScope,
            CodedIndexTag::TypeOrMethodDef,
        ];
        ALL.iter()
    }
}

/// A decoded coded index: the low `tag_bits` bits select one candidate
/// table, the high bits are the 1-based row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodedIndex {
    pub tag: CodedIndexTag,
    /// The value exactly as stored on the wire.
    pub raw: u32,
    /// `None` for reserved tag slots and out-of-list tags.
    pub table: Option<TableKind>,
    pub row: u32,
}

impl CodedIndex {
    pub fn is_none(&self) -> bool {
        self.table.is_none() || self.row == 0
    }

    pub fn target(&self) -> Option<TableIndex> {
        match self.table {
            Some(table) if self.row != 0 => Some(TableIndex { table, row: self.row }),
            _ => None,
        }
    }
}

/// A contiguous run of child rows owned by one parent row.
///
/// The wire format stores only `start`; `end` (exclusive) is implied by the
/// next parent row's start, or the end of the child table for the last
/// parent. Until the run is resolved `end` is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub table: TableKind,
    /// 1-based first row of the run, exactly as stored on the wire.
    pub start: u32,
    /// 1-based row one past the run; `0` while unresolved.
    pub end: u32,
}

impl RowRange {
    pub fn read(buffer: &mut Buffer, table: TableKind, context: &TableDecodeContext) -> Result<RowRange, std::io::Error> {
        let start = TableIndex::read(buffer, table, context)?;
        Ok(RowRange {
            table,
            start: start.row,
            end: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The run as 1-based row references into the child table.
    pub fn iter(&self) -> impl Iterator<Item = TableIndex> + '_ {
        let table = self.table;
        (self.start..self.end).map(move |row| TableIndex { table, row })
    }
}

/// # II.22 Metadata logical format: tables
///
/// [...]
///
/// Uncoded metadata tokens are 4-byte unsigned integers, which contain the
/// metadata table index in the most significant byte, and a 1-based record
/// index in the three least-significant bytes. Token `0x70` references the
/// `#US` heap rather than a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataToken(pub u32);

impl MetadataToken {
    pub const USER_STRING: u8 = 0x70;

    pub fn from_parts(table_number: u8, rid: u32) -> MetadataToken {
        MetadataToken((table_number as u32) << 24 | (rid & 0x00FF_FFFF))
    }

    pub fn table_number(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn table(&self) -> Option<TableKind> {
        TableKind::from_number(self.table_number())
    }

    pub fn rid(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    pub fn is_user_string(&self) -> bool {
        self.table_number() == Self::USER_STRING
    }

    pub fn table_index(&self) -> Option<TableIndex> {
        self.table().map(|table| TableIndex { table, row: self.rid() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coded_index_decode() {
        // HasConstant over Param: tag 1, row 0xC8.
        let index = CodedIndexTag::HasConstant.decode(0x321);
        assert_eq!(index.table, Some(TableKind::Param));
        assert_eq!(index.row, 0xC8);
        assert_eq!(index.raw, 0x321);
        assert!(!index.is_none());
    }

    #[test]
    fn reserved_slot_decodes_to_none() {
        let index = CodedIndexTag::CustomAttributeType.decode(0x0008 | 0x1);
        assert_eq!(index.table, None);
        assert_eq!(index.row, 1);
        assert_eq!(index.raw, 0x9);
        assert!(index.is_none());
        assert_eq!(index.target(), None);
    }

    #[test]
    fn zero_row_is_none() {
        let index = CodedIndexTag::Implementation.decode(0);
        assert_eq!(index.table, Some(TableKind::File));
        assert!(index.is_none());
    }

    #[test]
    fn width_thresholds() {
        // tag_bits = 2: promotes above 2^14 rows.
        let at_limit = |kind| if kind == TableKind::TypeDef { 1 << 14 } else { 0 };
        assert!(!CodedIndexTag::TypeDefOrRef.is_big_index(at_limit));
        let over_limit = |kind| if kind == TableKind::TypeDef { (1 << 14) + 1 } else { 0 };
        assert!(CodedIndexTag::TypeDefOrRef.is_big_index(over_limit));

        // tag_bits = 5
        let over = |kind| if kind == TableKind::MethodDef { (1 << 11) + 1 } else { 0 };
        assert!(CodedIndexTag::HasCustomAttribute.is_big_index(over));
    }

    #[test]
    fn row_range_iteration() {
        let range = RowRange { table: TableKind::Field, start: 3, end: 5 };
        let rows: Vec<u32> = range.iter().map(|index| index.row).collect();
        assert_eq!(rows, vec![3, 4]);
        assert_eq!(range.len(), 2);

        let empty = RowRange { table: TableKind::Field, start: 5, end: 5 };
        assert!(empty.is_empty());
    }

    #[test]
    fn token_parts() {
        let token = MetadataToken(0x0600_0001);
        assert_eq!(token.table(), Some(TableKind::MethodDef));
        assert_eq!(token.rid(), 1);
        assert!(!token.is_user_string());
        assert!(MetadataToken(0x7000_0001).is_user_string());
    }
}
