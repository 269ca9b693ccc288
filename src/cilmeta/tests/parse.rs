//! Facade-level assertions over the hello-world fixture.

mod common;

use cilmeta::{cast_row, ClrImage, Error, MetadataToken, Row, TableKind, METADATA_SIGNATURE};
use common::{hello_world_image, hello_world_metadata, PeBuilder, METADATA_RVA};

#[test]
fn parses_hello_world() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();
    assert!(image.warnings().is_empty(), "{:?}", image.warnings());

    let metadata = image.metadata.as_ref().unwrap();
    assert_eq!(metadata.signature, METADATA_SIGNATURE);
    assert_eq!(metadata.version, "v4.0.30319");

    for name in ["#~", "#Strings", "#US", "#GUID", "#Blob"] {
        assert!(image.stream(name).is_some(), "missing stream {}", name);
    }

    let tables = image.tables().unwrap();
    for kind in [
        TableKind::Module,
        TableKind::TypeRef,
        TableKind::TypeDef,
        TableKind::MethodDef,
        TableKind::Param,
        TableKind::MemberRef,
        TableKind::CustomAttribute,
        TableKind::Assembly,
        TableKind::AssemblyRef,
    ] {
        assert!(tables.table(kind).is_some(), "missing table {}", kind.name());
    }
    assert!(tables.table(TableKind::Field).is_none());

    let strings = image.strings().unwrap();
    let module = &tables.module().unwrap()[0];
    assert_eq!(strings.get_str(module.name).as_deref(), Some("1-hello-world.exe"));
    assert!(image.guids().unwrap().get(module.mvid).is_some());
}

#[test]
fn resolves_type_references() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();
    let tables = image.tables().unwrap();
    let strings = image.strings().unwrap();

    let hello_world = &tables.type_def().unwrap()[1];
    assert_eq!(strings.get_str(hello_world.type_name).as_deref(), Some("HelloWorld"));

    // Extends resolves to System.Object in mscorlib.
    let extends = cast_row!(Some(Row::TypeRef), tables.coded_row(hello_world.extends)).unwrap();
    assert_eq!(strings.get_str(extends.type_name).as_deref(), Some("Object"));
    assert_eq!(strings.get_str(extends.type_namespace).as_deref(), Some("System"));

    let scope = cast_row!(
        Some(Row::AssemblyRef),
        tables.coded_row(extends.resolution_scope)
    )
    .unwrap();
    assert_eq!(strings.get_str(scope.name).as_deref(), Some("mscorlib"));

    // The module pseudo-type extends nothing.
    let module_type = &tables.type_def().unwrap()[0];
    assert!(module_type.extends.is_none());
    assert_eq!(module_type.extends.raw, 0);
}

#[test]
fn resolves_method_and_param_runs() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();
    let tables = image.tables().unwrap();
    let strings = image.strings().unwrap();

    let methods = tables.method_def().unwrap();
    assert_eq!(strings.get_str(methods[0].name).as_deref(), Some("Main"));
    assert_eq!(strings.get_str(methods[1].name).as_deref(), Some(".ctor"));

    // Main owns exactly one Param row, named "args".
    assert_eq!(methods[0].param_list.len(), 1);
    let param_ref = methods[0].param_list.iter().next().unwrap();
    let param = cast_row!(Some(Row::Param), tables.row(param_ref)).unwrap();
    assert_eq!(strings.get_str(param.name).as_deref(), Some("args"));
    assert_eq!(param.sequence, 1);

    // .ctor owns none.
    assert!(methods[1].param_list.is_empty());

    // Both methods belong to HelloWorld; the module pseudo-type owns none.
    let types = tables.type_def().unwrap();
    assert!(types[0].method_list.is_empty());
    let owned: Vec<u32> = types[1].method_list.iter().map(|index| index.row).collect();
    assert_eq!(owned, vec![1, 2]);
}

#[test]
fn resolves_custom_attribute_references() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();
    let tables = image.tables().unwrap();
    let strings = image.strings().unwrap();

    let attribute = &tables.custom_attribute().unwrap()[0];
    assert_eq!(attribute.parent.table, Some(TableKind::Assembly));
    let ctor = cast_row!(Some(Row::MemberRef), tables.coded_row(attribute.type_)).unwrap();
    assert_eq!(strings.get_str(ctor.name).as_deref(), Some(".ctor"));

    let parent = cast_row!(Some(Row::TypeRef), tables.coded_row(ctor.class)).unwrap();
    assert_eq!(
        strings.get_str(parent.type_name).as_deref(),
        Some("CompilationRelaxationsAttribute")
    );

    // CustomAttribute carries the sort bit in the fixture.
    assert!(tables.table(TableKind::CustomAttribute).unwrap().is_sorted);
    assert!(!tables.table(TableKind::Module).unwrap().is_sorted);
}

#[test]
fn entry_point_and_user_strings() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();

    assert_eq!(
        image.clr_header.entry_point_token(),
        Some(MetadataToken(0x0600_0001))
    );
    assert_eq!(
        image.clr_header.entry_point_token().unwrap().table(),
        Some(TableKind::MethodDef)
    );

    let hello = image.user_strings().unwrap().get(1).unwrap();
    assert_eq!(hello.value.as_deref(), Some("Hello World!"));
    assert_eq!(hello.flag, Some(0));
}

/// Row slices line up with the declared layout: the first table starts
/// right after the header and the row-count vector, and every row index
/// addresses `table_rva + (i-1) * row_size`.
#[test]
fn table_rvas_follow_the_header() {
    let image = ClrImage::from_bytes(hello_world_image()).unwrap();
    let metadata = image.metadata.as_ref().unwrap();
    let tables_header = metadata
        .stream_headers
        .iter()
        .find(|header| header.name == "#~")
        .unwrap();
    let tables = image.tables().unwrap();

    let stream_rva = METADATA_RVA + tables_header.offset;
    let mut expected = stream_rva + 24 + 9 * 4;
    for table in tables.iter() {
        assert_eq!(table.rva, expected, "table {}", table.kind.name());
        expected += table.row_size * table.num_rows;
    }

    let module = tables.table(TableKind::Module).unwrap();
    assert_eq!(module.row_size, 10);
    assert_eq!(module.get_with_row_index(1), module.get(0));
    assert_eq!(module.get_with_row_index(0), None);
}

/// Even when the optional header's `NumberOfRvaAndSizes` is too small to
/// cover the COM descriptor entry, the CLR header is still found at the
/// fixed slot.
#[test]
fn short_directory_count_still_finds_clr_header() {
    let data = PeBuilder::new()
        .number_of_rva_and_sizes(6)
        .build(&hello_world_metadata());

    let image = ClrImage::from_bytes(data).unwrap();
    let tables = image.tables().unwrap();
    assert_eq!(tables.module().unwrap().len(), 1);
}

#[test]
fn in_image_resources_are_sliced() {
    let mut strings = common::StringsBuilder::new();
    let s_resource = strings.add("app.resources");

    let manifest_resource = common::RowBytes::new()
        .u32(0) // offset
        .u32(1) // public
        .u16(s_resource)
        .u16(0) // implementation: this assembly
        .0;

    let tables = common::TablesBuilder::new()
        .table(0x28, 1, manifest_resource)
        .build();
    let metadata = common::MetadataBuilder::new()
        .stream("#~", tables)
        .stream("#Strings", strings.build())
        .build();

    let payload = b"RESDATA";
    let mut resources = (payload.len() as u32).to_le_bytes().to_vec();
    resources.extend_from_slice(payload);

    let image = ClrImage::from_bytes(PeBuilder::new().resources(resources).build(&metadata)).unwrap();

    let resources = image.resources();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].name.as_deref(), Some("app.resources"));
    assert!(resources[0].is_public());
    assert_eq!(resources[0].implementation, None);
    assert_eq!(resources[0].data.as_deref(), Some(payload.as_slice()));
}

#[test]
fn image_without_clr_directory_is_not_dotnet() {
    // a bare PE with no CLR entry
    let mut data = vec![0u8; 0x400];
    data[0] = b'M';
    data[1] = b'Z';
    data[0x3c..0x40].copy_from_slice(&0x80u32.to_le_bytes());
    data[0x80..0x84].copy_from_slice(b"PE\0\0");
    data[0x84..0x86].copy_from_slice(&0x14cu16.to_le_bytes());
    data[0x94..0x96].copy_from_slice(&224u16.to_le_bytes());
    data[0x98..0x9a].copy_from_slice(&0x10bu16.to_le_bytes());
    data[0x98 + 92..0x98 + 96].copy_from_slice(&16u32.to_le_bytes());

    assert!(matches!(
        ClrImage::from_bytes(data),
        Err(Error::NotDotNet)
    ));
}
