
/// The metadata table numbers defined by ECMA-335 II.22, including the
/// non-public pointer tables and the edit-and-continue tables.
///
/// Numbers 45 through 61 are undefined; 62 is a placeholder slot referenced
/// by the `CustomAttributeType` coded index and 63 is the table-count
/// sentinel. Neither reserved slot has a row schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TableKind {
    /// # II.22.30 Module : 0x00
    Module = 0x00,
    /// # II.22.38 TypeRef : 0x01
    TypeRef = 0x01,
    /// # II.22.37 TypeDef : 0x02
    TypeDef = 0x02,
    FieldPtr = 0x03,
    /// # II.22.15 Field : 0x04
    Field = 0x04,
    MethodPtr = 0x05,
    /// # II.22.26 MethodDef : 0x06
    MethodDef = 0x06,
    ParamPtr = 0x07,
    /// # II.22.33 Param : 0x08
    Param = 0x08,
    /// # II.22.23 InterfaceImpl : 0x09
    InterfaceImpl = 0x09,
    /// # II.22.25 MemberRef : 0x0A
    MemberRef = 0x0a,
    /// # II.22.9 Constant : 0x0B
    Constant = 0x0b,
    /// # II.22.10 CustomAttribute : 0x0C
    CustomAttribute = 0x0c,
    /// # II.22.17 FieldMarshal : 0x0D
    FieldMarshal = 0x0d,
    /// # II.22.11 DeclSecurity : 0x0E
    DeclSecurity = 0x0e,
    /// # II.22.8 ClassLayout : 0x0F
    ClassLayout = 0x0f,
    /// # II.22.16 FieldLayout : 0x10
    FieldLayout = 0x10,
    /// # II.22.36 StandAloneSig : 0x11
    StandAloneSig = 0x11,
    /// # II.22.12 EventMap : 0x12
    EventMap = 0x12,
    EventPtr = 0x13,
    /// # II.22.13 Event : 0x14
    Event = 0x14,
    /// # II.22.35 PropertyMap : 0x15
    PropertyMap = 0x15,
    PropertyPtr = 0x16,
    /// # II.22.34 Property : 0x17
    Property = 0x17,
    /// # II.22.28 MethodSemantics : 0x18
    MethodSemantics = 0x18,
    /// # II.22.27 MethodImpl : 0x19
    MethodImpl = 0x19,
    /// # II.22.31 ModuleRef : 0x1A
    ModuleRef = 0x1a,
    /// # II.22.39 TypeSpec : 0x1B
    TypeSpec = 0x1b,
    /// # II.22.22 ImplMap : 0x1C
    ImplMap = 0x1c,
    /// # II.22.18 FieldRVA : 0x1D
    FieldRva = 0x1d,
    EncLog = 0x1e,
    EncMap = 0x1f,
    /// # II.22.2 Assembly : 0x20
    Assembly = 0x20,
    AssemblyProcessor = 0x21,
    AssemblyOS = 0x22,
    /// # II.22.5 AssemblyRef : 0x23
    AssemblyRef = 0x23,
    AssemblyRefProcessor = 0x24,
    AssemblyRefOS = 0x25,
    /// # II.22.19 File : 0x26
    File = 0x26,
    /// # II.22.14 ExportedType : 0x27
    ExportedType = 0x27,
    /// # II.22.24 ManifestResource : 0x28
    ManifestResource = 0x28,
    /// # II.22.32 NestedClass : 0x29
    NestedClass = 0x29,
    /// # II.22.20 GenericParam : 0x2A
    GenericParam = 0x2a,
    /// # II.22.29 MethodSpec : 0x2B
    MethodSpec = 0x2b,
    /// # II.22.21 GenericParamConstraint : 0x2C
    GenericParamConstraint = 0x2c,
    /// Placeholder referenced by the reserved `CustomAttributeType` slots.
    Unused = 0x3e,
    MaxTable = 0x3f,
}

impl TableKind {
    pub const MAX_TABLES: usize = 64;

    pub fn from_number(number: u8) -> Option<TableKind> {
        match number {
            0x00 => Some(TableKind::Module),
            0x01 => Some(TableKind::TypeRef),
            0x02 => Some(TableKind::TypeDef),
            0x03 => Some(TableKind::FieldPtr),
            0x04 => Some(TableKind::Field),
            0x05 => Some(TableKind::MethodPtr),
            0x06 => Some(TableKind::MethodDef),
            0x07 => Some(TableKind::ParamPtr),
            0x08 => Some(TableKind::Param),
            0x09 => Some(TableKind::InterfaceImpl),
            0x0a => Some(TableKind::MemberRef),
            0x0b => Some(TableKind::Constant),
            0x0c => Some(TableKind::CustomAttribute),
            0x0d => Some(TableKind::FieldMarshal),
            0x0e => Some(TableKind::DeclSecurity),
            0x0f => Some(TableKind::ClassLayout),
            0x10 => Some(TableKind::FieldLayout),
            0x11 => Some(TableKind::StandAloneSig),
            0x12 => Some(TableKind::EventMap),
            0x13 => Some(TableKind::EventPtr),
            0x14 => Some(TableKind::Event),
            0x15 => Some(TableKind::PropertyMap),
            0x16 => Some(TableKind::PropertyPtr),
            0x17 => Some(TableKind::Property),
            0x18 => Some(TableKind::MethodSemantics),
            0x19 => Some(TableKind::MethodImpl),
            0x1a => Some(TableKind::ModuleRef),
            0x1b => Some(TableKind::TypeSpec),
            0x1c => Some(TableKind::ImplMap),
            0x1d => Some(TableKind::FieldRva),
            0x1e => Some(TableKind::EncLog),
            0x1f => Some(TableKind::EncMap),
            0x20 => Some(TableKind::Assembly),
            0x21 => Some(TableKind::AssemblyProcessor),
            0x22 => Some(TableKind::AssemblyOS),
            0x23 => Some(TableKind::AssemblyRef),
            0x24 => Some(TableKind::AssemblyRefProcessor),
            0x25 => Some(TableKind::AssemblyRefOS),
            0x26 => Some(TableKind::File),
            0x27 => Some(TableKind::ExportedType),
            0x28 => Some(TableKind::ManifestResource),
            0x29 => Some(TableKind::NestedClass),
            0x2a => Some(TableKind::GenericParam),
            0x2b => Some(TableKind::MethodSpec),
            0x2c => Some(TableKind::GenericParamConstraint),
            0x3e => Some(TableKind::Unused),
            0x3f => Some(TableKind::MaxTable),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Module => "Module",
            TableKind::TypeRef => "TypeRef",
            TableKind::TypeDef => "TypeDef",
            TableKind::FieldPtr => "FieldPtr",
            TableKind::Field => "Field",
            TableKind::MethodPtr => "MethodPtr",
            TableKind::MethodDef => "MethodDef",
            TableKind::ParamPtr => "ParamPtr",
            TableKind::Param => "Param",
            TableKind::InterfaceImpl => "InterfaceImpl",
            TableKind::MemberRef => "MemberRef",
            TableKind::Constant => "Constant",
            TableKind::CustomAttribute => "CustomAttribute",
            TableKind::FieldMarshal => "FieldMarshal",
            TableKind::DeclSecurity => "DeclSecurity",
            TableKind::ClassLayout => "ClassLayout",
            TableKind::FieldLayout => "FieldLayout",
            TableKind::StandAloneSig => "StandAloneSig",
            TableKind::EventMap => "EventMap",
            TableKind::EventPtr => "EventPtr",
            TableKind::Event => "Event",
            TableKind::PropertyMap => "PropertyMap",
            TableKind::PropertyPtr => "PropertyPtr",
            TableKind::Property => "Property",
            TableKind::MethodSemantics => "MethodSemantics",
            TableKind::MethodImpl => "MethodImpl",
            TableKind::ModuleRef => "ModuleRef",
            TableKind::TypeSpec => "TypeSpec",
            TableKind::ImplMap => "ImplMap",
            TableKind::FieldRva => "FieldRva",
            TableKind::EncLog => "EncLog",
            TableKind::EncMap => "EncMap",
            TableKind::Assembly => "Assembly",
            TableKind::AssemblyProcessor => "AssemblyProcessor",
            TableKind::AssemblyOS => "AssemblyOS",
            TableKind::AssemblyRef => "AssemblyRef",
            TableKind::AssemblyRefProcessor => "AssemblyRefProcessor",
            TableKind::AssemblyRefOS => "AssemblyRefOS",
            TableKind::File => "File",
            TableKind::ExportedType => "ExportedType",
            TableKind::ManifestResource => "ManifestResource",
            TableKind::NestedClass => "NestedClass",
            TableKind::GenericParam => "GenericParam",
            TableKind::MethodSpec => "MethodSpec",
            TableKind::GenericParamConstraint => "GenericParamConstraint",
            TableKind::Unused => "Unused",
            TableKind::MaxTable => "MaxTable",
        }
    }

    pub fn from_name(name: &str) -> Option<TableKind> {
        (0u8..=0x3f).filter_map(TableKind::from_number).find(|kind| kind.name() == name)
    }

    /// The table numbers whose bit is set in a `MaskValid`/`MaskSorted`
    /// bit-vector, in ascending order.
    pub fn numbers_from_bitmask(bitmask: u64) -> impl Iterator<Item = u8> {
        (0u8..64).filter(move |i| bitmask & (1u64 << i) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_round_trip() {
        for number in 0u8..=0x3f {
            if let Some(kind) = TableKind::from_number(number) {
                assert_eq!(kind.number(), number);
                assert_eq!(TableKind::from_name(kind.name()), Some(kind));
            } else {
                assert!((0x2d..=0x3d).contains(&number));
            }
        }
    }

    #[test]
    fn bitmask_order_is_ascending() {
        let mask = (1u64 << 0x20) | (1u64 << 0x01) | (1u64 << 0x23) | 1;
        let numbers: Vec<u8> = TableKind::numbers_from_bitmask(mask).collect();
        assert_eq!(numbers, vec![0x00, 0x01, 0x20, 0x23]);
    }
}
