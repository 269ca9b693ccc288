
use paste::paste;

use crate::error::{Error, Result, Warnings};

use super::*;

#[macro_export]
macro_rules! cast_table {
    (Some($kind:ident), $expr:expr) => {
        match $expr {
            Some($crate::Table::$kind(rows)) => Some(rows),
            _ => None
        }
    };

    ($kind:ident, $expr:expr) => {
        match $expr {
            $crate::Table::$kind(rows) => rows,
            _ => panic!("Failed to cast table to {}", stringify!($kind))
        }
    };
}

fn read_rows<T: TableRow>(
    kind: TableKind,
    body: &[u8],
    row_size: u32,
    num_rows: u32,
    context: &TableDecodeContext,
    warnings: &mut Warnings,
) -> Vec<T> {
    let mut rows = Vec::with_capacity(body.len() / row_size.max(1) as usize);
    for i in 0..num_rows {
        let offset = i as usize * row_size as usize;
        let end = offset + row_size as usize;
        if end > body.len() {
            warnings.warn(format!(
                "not enough data to parse {} rows of {}: decoded {}",
                num_rows,
                kind.name(),
                i
            ));
            break;
        }

        // take a slice, then parse
        let mut buffer = Buffer::new(&body[offset..end]);
        match T::read(&mut buffer, context) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warnings.warn(format!("failed to decode {} row {}: {}", kind.name(), i + 1, e));
                break;
            }
        }
    }
    rows
}

macro_rules! define_tables {
    ($($kind:ident => $row:ty),* $(,)?) => {
        /// Homogeneous row storage for one present table.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Table {
            $($kind(Vec<$row>)),*
        }

        impl Table {
            fn read(
                kind: TableKind,
                body: &[u8],
                row_size: u32,
                num_rows: u32,
                context: &TableDecodeContext,
                warnings: &mut Warnings,
            ) -> Option<Table> {
                match kind {
                    $(
                        TableKind::$kind => Some(Table::$kind(
                            read_rows::<$row>(kind, body, row_size, num_rows, context, warnings),
                        )),
                    )*
                    TableKind::Unused | TableKind::MaxTable => None,
                }
            }

            /// Number of rows actually decoded, as opposed to the declared
            /// row count.
            pub fn len(&self) -> usize {
                match self {
                    $(Table::$kind(rows) => rows.len()),*
                }
            }

            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            pub fn get(&self, index: usize) -> Option<Row> {
                match self {
                    $(Table::$kind(rows) => rows.get(index).copied().map(Row::$kind)),*
                }
            }
        }

        paste! {
            impl MetadataTables {
                $(
                    /// Typed row access; `None` when the table is absent.
                    pub fn [<$kind:snake>](&self) -> Option<&[$row]> {
                        match &self.table(TableKind::$kind)?.rows {
                            Table::$kind(rows) => Some(rows),
                            _ => None,
                        }
                    }
                )*
            }
        }
    };
}

define_tables! {
    Module => ModuleRow,
    TypeRef => TypeRefRow,
    TypeDef => TypeDefRow,
    FieldPtr => FieldPtrRow,
    Field => FieldRow,
    MethodPtr => MethodPtrRow,
    MethodDef => MethodDefRow,
    ParamPtr => ParamPtrRow,
    Param => ParamRow,
    InterfaceImpl => InterfaceImplRow,
    MemberRef => MemberRefRow,
    Constant => ConstantRow,
    CustomAttribute => CustomAttributeRow,
    FieldMarshal => FieldMarshalRow,
    DeclSecurity => DeclSecurityRow,
    ClassLayout => ClassLayoutRow,
    FieldLayout => FieldLayoutRow,
    StandAloneSig => StandAloneSigRow,
    EventMap => EventMapRow,
    EventPtr => EventPtrRow,
    Event => EventRow,
    PropertyMap => PropertyMapRow,
    PropertyPtr => PropertyPtrRow,
    Property => PropertyRow,
    MethodSemantics => MethodSemanticsRow,
    MethodImpl => MethodImplRow,
    ModuleRef => ModuleRefRow,
    TypeSpec => TypeSpecRow,
    ImplMap => ImplMapRow,
    FieldRva => FieldRvaRow,
    EncLog => EncLogRow,
    EncMap => EncMapRow,
    Assembly => AssemblyRow,
    AssemblyProcessor => AssemblyProcessorRow,
    AssemblyOS => AssemblyOSRow,
    AssemblyRef => AssemblyRefRow,
    AssemblyRefProcessor => AssemblyRefProcessorRow,
    AssemblyRefOS => AssemblyRefOSRow,
    File => FileRow,
    ExportedType => ExportedTypeRow,
    ManifestResource => ManifestResourceRow,
    NestedClass => NestedClassRow,
    GenericParam => GenericParamRow,
    MethodSpec => MethodSpecRow,
    GenericParamConstraint => GenericParamConstraintRow,
}

/// # II.24.2.6 #~ stream
///
/// The "#~" streams contain the actual physical representations of the
/// logical metadata tables (§II.22). A "#~" stream has the following
/// top-level structure:
///
/// | Offset   | Size   | Field        | Description |
/// | -------- | ------ | ------------ | ----------- |
/// | 0        | 4      | Reserved     | Reserved, always 0 (§II.24.1) |
/// | 4        | 1      | MajorVersion | Major version of table schemata; shall be 2 (§II.24.1) |
/// | 5        | 1      | MinorVersion | Minor version of table schemata; shall be 0 (§II.24.1) |
/// | 6        | 1      | HeapSizes    | Bit vector for heap sizes. |
/// | 7        | 1      | Reserved     | Reserved, always 1 (§II.24.1) |
/// | 8        | 8      | Valid        | Bit vector of present tables, let n be the number of bits that are 1. |
/// | 16       | 8      | Sorted       | Bit vector of sorted tables. |
/// | 24       | 4*n    | Rows         | Array of n 4-byte unsigned integers indicating the number of rows for each present table. |
/// | 24+4*n   |        | Tables       | The sequence of physical tables. |
#[derive(Debug, Clone, Copy)]
pub struct TablesHeader {
    pub major_version: u8,
    pub minor_version: u8,
    pub heap_sizes: HeapSizes,
    pub valid: u64,
    pub sorted: u64,
}

impl TablesHeader {
    pub const SIZE: usize = 24;
}

/// One present metadata table: its decoded rows plus the header facts about
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTable {
    pub kind: TableKind,
    /// Declared row count from the header; the decoded count can be lower
    /// when the stream is truncated.
    pub num_rows: u32,
    pub row_size: u32,
    /// The `MaskSorted` bit. Recorded, never enforced.
    pub is_sorted: bool,
    pub rva: u32,
    pub rows: Table,
}

impl MetadataTable {
    /// Number of rows actually decoded.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0-based access, for sequential use.
    pub fn get(&self, index: usize) -> Option<Row> {
        self.rows.get(index)
    }

    /// 1-based access, matching the row numbers used in wire references.
    /// Row index 0 means "no reference" and yields `None`.
    pub fn get_with_row_index(&self, row_index: u32) -> Option<Row> {
        if row_index == 0 {
            return None;
        }
        self.rows.get(row_index as usize - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).filter_map(move |i| self.rows.get(i))
    }
}

/// The decoded `#~`/`#-` tables stream.
pub struct MetadataTables {
    pub header: TablesHeader,
    /// Row count per table slot; absent tables hold 0.
    pub row_counts: [u32; TableKind::MAX_TABLES],
    /// The trailing dword present when header bit 6 is set.
    pub extra_data: Option<u32>,
    tables: Vec<MetadataTable>,
}

impl MetadataTables {
    /// Decode a tables stream. `rva` is the stream's own RVA, used to tag
    /// each table with its location.
    ///
    /// Recoverable defects (unknown table numbers, truncated bodies) are
    /// recorded on `warnings`; only a header that cannot be framed at all
    /// is an error.
    pub fn parse(data: &[u8], rva: u32, warnings: &mut Warnings) -> Result<MetadataTables> {
        if data.len() < TablesHeader::SIZE {
            return Err(Error::format("unable to read metadata tables header"));
        }

        let mut buffer = Buffer::new(data);
        buffer.read_u32::<LittleEndian>()?; // Reserved
        let major_version = buffer.read_u8()?;
        let minor_version = buffer.read_u8()?;
        let heap_sizes = HeapSizes::from(buffer.read_u8()?);
        buffer.read_u8()?; // Reserved
        let valid = buffer.read_u64::<LittleEndian>()?;
        let sorted = buffer.read_u64::<LittleEndian>()?;

        let header = TablesHeader {
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
        };

        // One row-count dword per set bit, in ascending bit order.
        let mut row_counts = [0u32; TableKind::MAX_TABLES];
        for number in TableKind::numbers_from_bitmask(valid) {
            row_counts[number as usize] = buffer
                .read_u32::<LittleEndian>()
                .map_err(|_| Error::format("truncated metadata table row counts"))?;
        }

        let extra_data = if heap_sizes.has_extra_data() {
            Some(
                buffer
                    .read_u32::<LittleEndian>()
                    .map_err(|_| Error::format("truncated metadata extra data"))?,
            )
        } else {
            None
        };

        let context = TableDecodeContext::new(row_counts, heap_sizes);
        let mut cursor = buffer.position() as usize;
        let mut tables = Vec::with_capacity(valid.count_ones() as usize);

        for number in TableKind::numbers_from_bitmask(valid) {
            let num_rows = row_counts[number as usize];

            let Some(kind) = TableKind::from_number(number) else {
                warnings.warn(format!("invalid metadata table number {}", number));
                continue;
            };
            let Some(row_size) = kind.row_size(&context) else {
                warnings.warn(format!("metadata table {} has no row schema", kind.name()));
                continue;
            };

            let table_rva = rva + cursor as u32;
            // every multiplication against the declared row count is
            // untrusted input
            let body_len = (row_size as usize).saturating_mul(num_rows as usize);
            let start = cursor.min(data.len());
            let body = &data[start..cursor.saturating_add(body_len).min(data.len())];
            cursor = cursor.saturating_add(body_len);

            let rows = match Table::read(kind, body, row_size, num_rows, &context, warnings) {
                Some(rows) => rows,
                None => continue,
            };

            tables.push(MetadataTable {
                kind,
                num_rows,
                row_size,
                is_sorted: sorted & (1u64 << number) != 0,
                rva: table_rva,
                rows,
            });
        }

        resolve_row_ranges(&mut tables, &context);

        Ok(MetadataTables {
            header,
            row_counts,
            extra_data,
            tables,
        })
    }

    pub fn tables(&self) -> &[MetadataTable] {
        &self.tables
    }

    pub fn table(&self, kind: TableKind) -> Option<&MetadataTable> {
        self.tables.iter().find(|table| table.kind == kind)
    }

    pub fn table_by_number(&self, number: u8) -> Option<&MetadataTable> {
        TableKind::from_number(number).and_then(|kind| self.table(kind))
    }

    pub fn table_by_name(&self, name: &str) -> Option<&MetadataTable> {
        TableKind::from_name(name).and_then(|kind| self.table(kind))
    }

    /// Resolve a row reference. Dangling references (absent table, row 0,
    /// row out of range) yield `None`.
    pub fn row(&self, index: TableIndex) -> Option<Row> {
        self.table(index.table)?.get_with_row_index(index.row)
    }

    /// Resolve a coded row reference, treating reserved slots as "none".
    pub fn coded_row(&self, index: CodedIndex) -> Option<Row> {
        self.row(index.target()?)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataTable> {
        self.tables.iter()
    }
}

/// Second pass: fix up every run-list's end bound, which depends on the
/// following row of the parent table and on the child table's row count.
///
/// The run owned by parent row *i* is `[start_i, start_{i+1})`, clamped to
/// the child table's end; the last parent owns through the end of the child
/// table.
fn resolve_row_ranges(tables: &mut [MetadataTable], context: &TableDecodeContext) {
    for table in tables.iter_mut() {
        match &mut table.rows {
            Table::TypeDef(rows) => {
                resolve_runs(rows, context.row_count(TableKind::Field), |row| &mut row.field_list);
                resolve_runs(rows, context.row_count(TableKind::MethodDef), |row| {
                    &mut row.method_list
                });
            }
            Table::MethodDef(rows) => {
                resolve_runs(rows, context.row_count(TableKind::Param), |row| &mut row.param_list);
            }
            Table::EventMap(rows) => {
                resolve_runs(rows, context.row_count(TableKind::Event), |row| &mut row.event_list);
            }
            Table::PropertyMap(rows) => {
                resolve_runs(rows, context.row_count(TableKind::Property), |row| {
                    &mut row.property_list
                });
            }
            _ => {}
        }
    }
}

fn resolve_runs<R: Copy>(
    rows: &mut [R],
    child_rows: u32,
    field: impl Fn(&mut R) -> &mut RowRange,
) {
    // one past the last child row
    let child_end = child_rows + 1;

    for i in 0..rows.len() {
        let next_start = if i + 1 < rows.len() {
            let mut next = rows[i + 1];
            Some(field(&mut next).start)
        } else {
            None
        };

        let range = field(&mut rows[i]);
        if range.start == 0 {
            // no valid run start on the wire
            range.end = 0;
            continue;
        }

        let end = match next_start {
            Some(start) if start >= 1 => start.min(child_end),
            _ => child_end,
        };
        range.end = end.max(range.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    struct TablesStreamBuilder {
        heap_sizes: u8,
        tables: Vec<(u8, u32, Vec<u8>)>,
        extra_data: Option<u32>,
        sorted: u64,
    }

    impl TablesStreamBuilder {
        fn new() -> TablesStreamBuilder {
            TablesStreamBuilder {
                heap_sizes: 0,
                tables: Vec::new(),
                extra_data: None,
                sorted: 0,
            }
        }

        fn table(mut self, number: u8, num_rows: u32, body: Vec<u8>) -> Self {
            self.tables.push((number, num_rows, body));
            self
        }

        fn extra_data(mut self, value: u32) -> Self {
            self.extra_data = Some(value);
            self.heap_sizes |= HeapSizes::EXTRA_DATA_FLAG;
            self
        }

        fn build(mut self) -> Vec<u8> {
            self.tables.sort_by_key(|(number, _, _)| *number);
            let valid: u64 = self
                .tables
                .iter()
                .fold(0, |mask, (number, _, _)| mask | 1u64 << number);

            let mut data = Vec::new();
            data.write_u32::<LittleEndian>(0).unwrap();
            data.write_u8(2).unwrap();
            data.write_u8(0).unwrap();
            data.write_u8(self.heap_sizes).unwrap();
            data.write_u8(1).unwrap();
            data.write_u64::<LittleEndian>(valid).unwrap();
            data.write_u64::<LittleEndian>(self.sorted).unwrap();
            for (_, num_rows, _) in &self.tables {
                data.write_u32::<LittleEndian>(*num_rows).unwrap();
            }
            if let Some(extra) = self.extra_data {
                data.write_u32::<LittleEndian>(extra).unwrap();
            }
            for (_, _, body) in &self.tables {
                data.write_all(body).unwrap();
            }
            data
        }
    }

    fn le16(value: u16) -> [u8; 2] {
        value.to_le_bytes()
    }

    /// TypeDef rows with FieldList starts (1, 3) over four Field rows:
    /// the first type owns fields 1..2, the second owns 3..4.
    #[test]
    fn run_list_tail_ownership() {
        let mut typedef_body = Vec::new();
        for start in [1u16, 3] {
            typedef_body.extend_from_slice(&[0, 0, 0, 0]); // flags
            typedef_body.extend_from_slice(&le16(0)); // name
            typedef_body.extend_from_slice(&le16(0)); // namespace
            typedef_body.extend_from_slice(&le16(0)); // extends
            typedef_body.extend_from_slice(&le16(start)); // field list
            typedef_body.extend_from_slice(&le16(1)); // method list
        }
        let mut field_body = Vec::new();
        for _ in 0..4 {
            field_body.extend_from_slice(&le16(0)); // flags
            field_body.extend_from_slice(&le16(0)); // name
            field_body.extend_from_slice(&le16(0)); // signature
        }

        let data = TablesStreamBuilder::new()
            .table(0x02, 2, typedef_body)
            .table(0x04, 4, field_body)
            .build();

        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0, &mut warnings).unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings.as_slice());

        let typedefs = tables.type_def().unwrap();
        assert_eq!(typedefs[0].field_list.start, 1);
        assert_eq!(typedefs[0].field_list.end, 3);
        assert_eq!(typedefs[0].field_list.len(), 2);
        assert_eq!(typedefs[1].field_list.start, 3);
        assert_eq!(typedefs[1].field_list.end, 5);
        let rows: Vec<u32> = typedefs[1].field_list.iter().map(|index| index.row).collect();
        assert_eq!(rows, vec![3, 4]);

        // the runs partition [1, rowcount]
        let total: usize = typedefs.iter().map(|row| row.field_list.len()).sum();
        assert_eq!(total, 4);
    }

    /// The Field table is absent: every run resolves empty.
    #[test]
    fn run_list_absent_child() {
        let mut typedef_body = Vec::new();
        typedef_body.extend_from_slice(&[0, 0, 0, 0]);
        typedef_body.extend_from_slice(&le16(0));
        typedef_body.extend_from_slice(&le16(0));
        typedef_body.extend_from_slice(&le16(0));
        typedef_body.extend_from_slice(&le16(1)); // field list -> absent table
        typedef_body.extend_from_slice(&le16(1)); // method list -> absent table

        let data = TablesStreamBuilder::new().table(0x02, 1, typedef_body).build();
        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0, &mut warnings).unwrap();

        let row = &tables.type_def().unwrap()[0];
        assert!(row.field_list.is_empty());
        assert!(row.method_list.is_empty());
    }

    #[test]
    fn truncated_body_keeps_whole_rows() {
        // Module is 10 bytes/row; declare 2 rows but provide 15 bytes.
        let body = vec![0u8; 15];
        let data = TablesStreamBuilder::new().table(0x00, 2, body).build();

        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0, &mut warnings).unwrap();
        let module = tables.table(TableKind::Module).unwrap();
        assert_eq!(module.num_rows, 2);
        assert_eq!(module.len(), 1);
        assert!(!warnings.is_empty());
    }

    #[test]
    fn extra_data_dword_is_consumed() {
        let body = vec![0u8; 10];
        let data = TablesStreamBuilder::new()
            .table(0x00, 1, body)
            .extra_data(0xDEAD_BEEF)
            .build();

        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0, &mut warnings).unwrap();
        assert_eq!(tables.extra_data, Some(0xDEAD_BEEF));
        // the module row decoded cleanly after the extra dword
        assert_eq!(tables.table(TableKind::Module).unwrap().len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_table_number_is_skipped() {
        let body = vec![0u8; 10];
        let mut data = TablesStreamBuilder::new().table(0x00, 1, body).build();
        // set a bit with no defined schema (45) and splice in its row count
        let valid = u64::from_le_bytes(data[8..16].try_into().unwrap()) | 1 << 45;
        data[8..16].copy_from_slice(&valid.to_le_bytes());
        // row counts start at offset 24: Module first, then table 45
        let mut spliced = data[..28].to_vec();
        spliced.extend_from_slice(&7u32.to_le_bytes());
        spliced.extend_from_slice(&data[28..]);

        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&spliced, 0, &mut warnings).unwrap();
        assert_eq!(tables.row_counts[45], 7);
        assert!(tables.table_by_number(45).is_none());
        assert!(!warnings.is_empty());
        // Module still decoded
        assert_eq!(tables.table(TableKind::Module).unwrap().len(), 1);
    }

    #[test]
    fn header_too_short_is_fatal() {
        let mut warnings = Warnings::new();
        let result = MetadataTables::parse(&[0u8; 10], 0, &mut warnings);
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn table_rva_accounts_for_header() {
        let body = vec![0u8; 10];
        let data = TablesStreamBuilder::new().table(0x00, 1, body).build();
        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0x4000, &mut warnings).unwrap();
        let module = tables.table(TableKind::Module).unwrap();
        // header (24) + one row count (4)
        assert_eq!(module.rva, 0x4000 + 28);
        assert_eq!(module.row_size, 10);
    }

    #[test]
    fn row_lookup_is_one_based() {
        let mut body = Vec::new();
        body.extend_from_slice(&le16(5)); // generation
        body.extend_from_slice(&le16(1)); // name
        body.extend_from_slice(&le16(1)); // mvid
        body.extend_from_slice(&le16(0));
        body.extend_from_slice(&le16(0));
        let data = TablesStreamBuilder::new().table(0x00, 1, body).build();

        let mut warnings = Warnings::new();
        let tables = MetadataTables::parse(&data, 0, &mut warnings).unwrap();

        let index = TableIndex::new(TableKind::Module, 1);
        let row = crate::cast_row!(Some(Row::Module), tables.row(index)).unwrap();
        assert_eq!(row.generation, 5);

        assert!(tables.row(TableIndex::new(TableKind::Module, 0)).is_none());
        assert!(tables.row(TableIndex::new(TableKind::Module, 2)).is_none());
        assert!(tables.row(TableIndex::new(TableKind::Field, 1)).is_none());
    }
}
