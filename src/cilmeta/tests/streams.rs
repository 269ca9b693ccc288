//! Stream directory edge cases driven through the facade.

mod common;

use cilmeta::{ClrImage, Stream};
use common::{MetadataBuilder, PeBuilder, TablesBuilder, UserStringsBuilder};

fn image_with_streams(builder: MetadataBuilder) -> ClrImage {
    ClrImage::from_bytes(PeBuilder::new().build(&builder.build())).unwrap()
}

/// Two `#US` streams: a warning is recorded and lookups resolve to the
/// last one, matching the runtime.
#[test]
fn duplicate_user_string_stream_last_wins() {
    let mut first = UserStringsBuilder::new();
    first.add("AAAAAAAA");
    let mut second = UserStringsBuilder::new();
    second.add("BBBBBBBB");

    let image = image_with_streams(
        MetadataBuilder::new()
            .stream("#~", TablesBuilder::new().build())
            .stream("#US", first.build())
            .stream("#US", second.build()),
    );

    assert!(image
        .warnings()
        .iter()
        .any(|warning| warning.contains("duplicate stream name '#US'")));

    let hello = image.user_strings().unwrap().get(1).unwrap();
    assert_eq!(hello.value.as_deref(), Some("BBBBBBBB"));
}

/// An unrecognized stream name is preserved verbatim and stays reachable
/// through the streams map.
#[test]
fn unknown_stream_name_is_preserved() {
    let image = image_with_streams(
        MetadataBuilder::new()
            .stream("#~", TablesBuilder::new().build())
            .stream("#ZZ", vec![0xDE, 0xAD, 0xBE, 0xEF]),
    );

    assert_eq!(image.streams.len(), 2);
    match image.stream("#ZZ") {
        Some(Stream::Generic(generic)) => {
            assert_eq!(generic.name, "#ZZ");
            assert_eq!(generic.data, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        }
        _ => panic!("expected #ZZ to survive as a generic stream"),
    }
    // no warning beyond an informational note
    assert!(image.warnings().is_empty());
}

/// An odd-length `#US` item splits off its trailing handling flag; the
/// string bytes stay exposed even when UTF-16 decoding fails.
#[test]
fn user_string_flag_byte_through_facade() {
    let mut user_strings = UserStringsBuilder::new();
    let offset = user_strings.add("héllo");

    let image = image_with_streams(
        MetadataBuilder::new()
            .stream("#~", TablesBuilder::new().build())
            .stream("#US", user_strings.build()),
    );

    let heap = image.user_strings().unwrap();
    let item = heap.get(offset).unwrap();
    // five UTF-16 units plus the flag: declared length 11
    assert_eq!(item.raw_size, 12);
    assert_eq!(item.flag, Some(0x01));
    assert_eq!(item.bytes.len(), 10);
    assert_eq!(item.value.as_deref(), Some("héllo"));
    assert_eq!(heap.get_bytes(offset).unwrap().len(), 10);
}

/// A tables stream too short for its own header degrades to a generic
/// stream with a warning while the rest of the image stays usable.
#[test]
fn broken_tables_stream_is_best_effort() {
    let mut user_strings = UserStringsBuilder::new();
    user_strings.add("still readable");

    let image = image_with_streams(
        MetadataBuilder::new()
            .stream("#~", vec![0u8; 8])
            .stream("#US", user_strings.build()),
    );

    assert!(image.tables().is_none());
    assert!(matches!(image.stream("#~"), Some(Stream::Generic(_))));
    assert!(!image.warnings().is_empty());
    assert_eq!(
        image.user_strings().unwrap().get(1).unwrap().value.as_deref(),
        Some("still readable")
    );
}
