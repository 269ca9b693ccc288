//! The `#Strings`, `#US`, `#GUID` and `#Blob` heap streams.
//!
//! Heaps keep their raw byte run and decode on access: any offset inside the
//! stream is addressable, including garbage between reachable items. Every
//! item carries its raw bytes, the RVA it came from, and an interpreted
//! value that is `None` when decoding fails.

use std::fmt;

use super::*;

/// Cap on the NUL scan when reading from the string heap. A longer gap
/// yields no result rather than an error.
pub const MAX_STRING_LENGTH: u32 = 0x10_0000;

/// An item from the `#Strings` heap: NUL-terminated UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapItemString {
    pub bytes: Vec<u8>,
    pub rva: u32,
    /// Decoded string, or `None` when the bytes are not valid UTF-8.
    pub value: Option<String>,
}

impl HeapItemString {
    fn new(bytes: &[u8], rva: u32) -> HeapItemString {
        let value = match std::str::from_utf8(bytes) {
            Ok(s) => Some(s.to_string()),
            Err(_) => {
                log::warn!("string at rva 0x{:08x}: invalid encoding", rva);
                None
            }
        };
        HeapItemString {
            bytes: bytes.to_vec(),
            rva,
            value,
        }
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn raw_size(&self) -> u32 {
        self.bytes.len() as u32
    }
}

/// # II.24.2.3 #Strings heap
///
/// The stream of bytes pointed to by a "#Strings" header is the physical
/// representation of the logical string heap. The physical heap can contain
/// garbage, that is, it can contain parts that are unreachable from any of
/// the tables, but parts that are reachable from a table shall contain a
/// valid null-terminated UTF8 string. When the #String heap is present, the
/// first entry is always the empty string (i.e., \0).
pub struct StringsHeap {
    data: Vec<u8>,
    rva: u32,
}

impl StringsHeap {
    pub fn new(data: Vec<u8>, rva: u32) -> StringsHeap {
        StringsHeap { data, rva }
    }

    pub fn get(&self, index: impl Into<StringIndex>) -> Option<HeapItemString> {
        self.get_with_max_length(index, MAX_STRING_LENGTH)
    }

    /// Read the null-terminated string starting at `index`. Returns `None`
    /// when the offset is out of range or the next NUL is further away than
    /// `max_length`.
    pub fn get_with_max_length(&self, index: impl Into<StringIndex>, max_length: u32) -> Option<HeapItemString> {
        let offset = index.into().0 as usize;
        if offset >= self.data.len() {
            log::warn!(
                "string heap is too small: wanted 0x{:x} found 0x{:x}",
                offset,
                self.data.len()
            );
            return None;
        }

        let rest = &self.data[offset..];
        let end = rest.iter().position(|b| *b == 0).unwrap_or(rest.len());
        if end as u32 > max_length {
            return None;
        }

        Some(HeapItemString::new(&rest[..end], self.rva + offset as u32))
    }

    /// Convenience accessor: the decoded string, or `None` on any error.
    pub fn get_str(&self, index: impl Into<StringIndex>) -> Option<String> {
        self.get(index)?.value
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// An item from the `#Blob` heap (or the `#US` heap before string
/// interpretation): a compressed-integer length prefix followed by that many
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapItemBlob {
    pub value: Vec<u8>,
    pub rva: u32,
    /// Declared item length, from the compressed prefix.
    pub item_size: u32,
    /// Bytes occupied in the stream, including the length prefix.
    pub raw_size: u32,
}

impl HeapItemBlob {
    pub fn value_bytes(&self) -> &[u8] {
        &self.value
    }
}

/// # II.24.2.4 #US and #Blob heaps
///
/// The stream of bytes pointed to by a "#US" or "#Blob" header are the
/// physical representation of logical Userstring and 'blob' heaps
/// respectively. Both these heaps can contain garbage, as long as any part
/// that is reachable from any of the tables contains a valid 'blob'.
/// Individual blobs are stored with their length encoded in the first few
/// bytes (see [`read_compressed_u32`]).
///
/// The first entry in both these heaps is the empty 'blob' that consists of
/// the single byte 0x00.
pub struct BlobHeap {
    data: Vec<u8>,
    rva: u32,
}

impl BlobHeap {
    pub fn new(data: Vec<u8>, rva: u32) -> BlobHeap {
        BlobHeap { data, rva }
    }

    pub fn get(&self, index: impl Into<BlobIndex>) -> Option<HeapItemBlob> {
        let offset = index.into().0 as usize;
        read_blob_item(&self.data, offset, self.rva)
    }

    pub fn get_bytes(&self, index: impl Into<BlobIndex>) -> Option<Vec<u8>> {
        Some(self.get(index)?.value)
    }

    /// The item bytes plus the total size occupied in the stream, length
    /// prefix included.
    pub fn get_with_size(&self, index: impl Into<BlobIndex>) -> Option<(Vec<u8>, u32)> {
        let item = self.get(index)?;
        Some((item.value, item.raw_size))
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

fn read_blob_item(data: &[u8], offset: usize, heap_rva: u32) -> Option<HeapItemBlob> {
    if offset >= data.len() {
        log::warn!(
            "stream is too small: wanted 0x{:x} found 0x{:x}",
            offset,
            data.len()
        );
        return None;
    }

    let rest = &data[offset..];
    let Some((length, prefix_size)) = read_compressed_u32(rest) else {
        log::warn!(
            "invalid compressed length at rva 0x{:08x}",
            heap_rva + offset as u32
        );
        return None;
    };

    let end = prefix_size.checked_add(length as usize)?;
    if end > rest.len() {
        log::warn!(
            "blob of {} bytes at rva 0x{:08x} runs past the end of the stream",
            length,
            heap_rva + offset as u32
        );
        return None;
    }

    Some(HeapItemBlob {
        value: rest[prefix_size..end].to_vec(),
        rva: heap_rva + offset as u32,
        item_size: length,
        raw_size: end as u32,
    })
}

/// An item from the `#US` heap.
///
/// # II.24.2.4 #US and #Blob heaps
///
/// [...]
///
/// Strings in the #US (user string) heap are encoded using 16-bit Unicode
/// encodings. The count on each string is the number of bytes (not
/// characters) in the string. Furthermore, there is an additional terminal
/// byte (so all byte counts are odd, not even). This final byte holds the
/// value 1 if and only if any UTF16 character within the string has any bit
/// set in its top byte, or its low byte is any of the following: `0x01`-`0x08`,
/// `0x0E`-`0x1F`, `0x27`, `0x2D`, `0x7F`. Otherwise, it holds 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserString {
    /// The string bytes, trailing flag excluded.
    pub bytes: Vec<u8>,
    pub rva: u32,
    /// The trailing handling-flag byte; `None` when the declared length is
    /// even and the flag is therefore missing.
    pub flag: Option<u8>,
    /// Decoded UTF-16LE string, or `None` when decoding fails.
    pub value: Option<String>,
    /// Bytes occupied in the stream, including the length prefix.
    pub raw_size: u32,
}

impl UserString {
    fn from_blob(item: HeapItemBlob) -> UserString {
        let mut bytes = item.value;
        let flag = if item.item_size % 2 == 1 {
            let flag = bytes.pop();
            match flag {
                Some(0x00) | Some(0x01) => {}
                Some(other) => log::warn!("unexpected string flag value: 0x{:02x}", other),
                None => {}
            }
            flag
        } else {
            log::warn!("string at rva 0x{:08x} missing trailing flag", item.rva);
            None
        };

        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let value = match String::from_utf16(&units) {
            Ok(s) if bytes.len() % 2 == 0 => Some(s),
            _ => {
                log::warn!("user string decode error at rva 0x{:08x}", item.rva);
                None
            }
        };

        UserString {
            bytes,
            rva: item.rva,
            flag,
            value,
            raw_size: item.raw_size,
        }
    }

    pub fn value_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// # II.24.2.4 #US and #Blob heaps
///
/// The user-string heap shares the blob framing; see [`UserString`] for the
/// interpretation of each item. Index 0 is reserved (conventionally the
/// empty blob).
pub struct UserStringHeap {
    data: Vec<u8>,
    rva: u32,
}

impl UserStringHeap {
    pub fn new(data: Vec<u8>, rva: u32) -> UserStringHeap {
        UserStringHeap { data, rva }
    }

    pub fn get(&self, index: u32) -> Option<UserString> {
        let item = read_blob_item(&self.data, index as usize, self.rva)?;
        Some(UserString::from_blob(item))
    }

    pub fn get_bytes(&self, index: u32) -> Option<Vec<u8>> {
        Some(self.get(index)?.bytes)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Walk the whole heap front to back. Iteration stops at the first
    /// entry whose length prefix cannot be framed; garbage between
    /// reachable items is yielded as items like everything else.
    pub fn iter(&self) -> UserStringIter<'_> {
        UserStringIter {
            heap: self,
            offset: 0,
        }
    }
}

pub struct UserStringIter<'a> {
    heap: &'a UserStringHeap,
    offset: usize,
}

impl Iterator for UserStringIter<'_> {
    type Item = (u32, UserString);

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.heap.data.len() {
            return None;
        }
        let offset = self.offset as u32;
        let item = self.heap.get(offset)?;
        self.offset += item.raw_size as usize;
        Some((offset, item))
    }
}

/// A 16-byte GUID from the `#GUID` heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapItemGuid {
    pub bytes: [u8; 16],
    pub rva: u32,
}

impl HeapItemGuid {
    pub const ITEM_SIZE: usize = 16;

    pub fn value_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Display form: the first three fields are little-endian u32/u16/u16, the
/// last two are raw 2- and 6-byte tails.
impl fmt::Display for HeapItemGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = u32::from_le_bytes(self.bytes[0..4].try_into().unwrap());
        let b = u16::from_le_bytes(self.bytes[4..6].try_into().unwrap());
        let c = u16::from_le_bytes(self.bytes[6..8].try_into().unwrap());
        write!(f, "{:08x}-{:04x}-{:04x}-", a, b, c)?;
        for byte in &self.bytes[8..10] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "-")?;
        for byte in &self.bytes[10..16] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// # II.22 Metadata logical format: tables
///
/// [...]
///
/// The Guid heap is an array of GUIDs, each 16 bytes wide. Its first element
/// is numbered 1, its second 2, and so on.
pub struct GuidHeap {
    data: Vec<u8>,
    rva: u32,
}

impl GuidHeap {
    pub fn new(data: Vec<u8>, rva: u32) -> GuidHeap {
        GuidHeap { data, rva }
    }

    /// One-based lookup; index 0 is "no GUID".
    pub fn get(&self, index: impl Into<GuidIndex>) -> Option<HeapItemGuid> {
        let index = index.into().0 as usize;
        if index < 1 || index > self.len() {
            return None;
        }

        let offset = (index - 1) * HeapItemGuid::ITEM_SIZE;
        Some(HeapItemGuid {
            bytes: self.data[offset..offset + HeapItemGuid::ITEM_SIZE]
                .try_into()
                .unwrap(),
            rva: self.rva + offset as u32,
        })
    }

    pub fn get_str(&self, index: impl Into<GuidIndex>) -> Option<String> {
        Some(self.get(index)?.to_string())
    }

    pub fn len(&self) -> usize {
        self.data.len() / HeapItemGuid::ITEM_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_heap_lookups() {
        let heap = StringsHeap::new(b"\0Hello\0World\0".to_vec(), 0x1000);
        assert_eq!(heap.get_str(0u32), Some(String::new()));
        assert_eq!(heap.get_str(1u32), Some("Hello".to_string()));
        assert_eq!(heap.get_str(7u32), Some("World".to_string()));
        // mid-string offsets address the tail
        assert_eq!(heap.get_str(3u32), Some("llo".to_string()));
        assert_eq!(heap.get(100u32), None);

        let item = heap.get(1u32).unwrap();
        assert_eq!(item.rva, 0x1001);
        assert_eq!(item.value_bytes(), b"Hello");
    }

    #[test]
    fn strings_heap_cap() {
        let mut data = vec![b'a'; 64];
        data.push(0);
        let heap = StringsHeap::new(data, 0);
        assert!(heap.get_with_max_length(0u32, 16).is_none());
        assert!(heap.get_with_max_length(0u32, 64).is_some());
    }

    #[test]
    fn strings_heap_invalid_utf8() {
        let heap = StringsHeap::new(vec![0xFF, 0xFE, 0x41, 0x00], 0);
        let item = heap.get(0u32).unwrap();
        assert_eq!(item.value, None);
        assert_eq!(item.value_bytes(), &[0xFF, 0xFE, 0x41]);
    }

    #[test]
    fn unterminated_string_reads_to_end() {
        let heap = StringsHeap::new(b"\0abc".to_vec(), 0);
        assert_eq!(heap.get_str(1u32), Some("abc".to_string()));
    }

    #[test]
    fn blob_heap_framing() {
        // empty blob, then a 3-byte blob, then a 2-byte-prefix blob
        let mut data = vec![0u8];
        data.extend_from_slice(&[0x03, 0xAA, 0xBB, 0xCC]);
        data.extend_from_slice(&[0x80, 0x02, 0x11, 0x22]);
        let heap = BlobHeap::new(data, 0x2000);

        let empty = heap.get(0u32).unwrap();
        assert_eq!(empty.value, Vec::<u8>::new());
        assert_eq!(empty.raw_size, 1);

        let item = heap.get(1u32).unwrap();
        assert_eq!(item.value, vec![0xAA, 0xBB, 0xCC]);
        assert_eq!(item.item_size, 3);
        assert_eq!(item.raw_size, 4);
        assert_eq!(item.rva, 0x2001);

        let wide = heap.get(5u32).unwrap();
        assert_eq!(wide.value, vec![0x11, 0x22]);
        assert_eq!(wide.raw_size, 4);
    }

    #[test]
    fn blob_heap_overrun_is_none() {
        let heap = BlobHeap::new(vec![0x10, 0x01, 0x02], 0);
        assert_eq!(heap.get(0u32), None);
        assert_eq!(heap.get(9u32), None);
    }

    #[test]
    fn user_string_with_flag() {
        // declared length 11: ten UTF-16 bytes plus flag 0x01
        let mut data = vec![0u8, 0x0B];
        for unit in "He\u{2603}lo".encode_utf16() {
            data.extend_from_slice(&unit.to_le_bytes());
        }
        data.push(0x01);
        let heap = UserStringHeap::new(data, 0);

        let item = heap.get(1).unwrap();
        assert_eq!(item.flag, Some(0x01));
        assert_eq!(item.bytes.len(), 10);
        assert_eq!(item.value.as_deref(), Some("He\u{2603}lo"));
        assert_eq!(heap.get_bytes(1).unwrap().len(), 10);
    }

    #[test]
    fn user_string_unpaired_surrogate_keeps_bytes() {
        // lone high surrogate 0xD800: undecodable, flag still split off
        let data = vec![0x03, 0x00, 0xD8, 0x01];
        let heap = UserStringHeap::new(data, 0);
        let item = heap.get(0).unwrap();
        assert_eq!(item.flag, Some(0x01));
        assert_eq!(item.value, None);
        assert_eq!(item.value_bytes(), &[0x00, 0xD8]);
    }

    #[test]
    fn user_string_missing_flag() {
        // even declared length: no trailing flag byte
        let data = vec![0x02, 0x41, 0x00];
        let heap = UserStringHeap::new(data, 0);
        let item = heap.get(0).unwrap();
        assert_eq!(item.flag, None);
        assert_eq!(item.value.as_deref(), Some("A"));
    }

    #[test]
    fn user_string_iteration() {
        let mut data = vec![0u8];
        for value in ["one", "two"] {
            let units: Vec<u16> = value.encode_utf16().collect();
            data.push(units.len() as u8 * 2 + 1);
            for unit in units {
                data.extend_from_slice(&unit.to_le_bytes());
            }
            data.push(0);
        }
        let heap = UserStringHeap::new(data, 0);

        let items: Vec<(u32, Option<String>)> = heap
            .iter()
            .map(|(offset, item)| (offset, item.value))
            .collect();
        assert_eq!(
            items,
            vec![
                (0, Some(String::new())),
                (1, Some("one".to_string())),
                (9, Some("two".to_string())),
            ]
        );
    }

    #[test]
    fn guid_heap_display() {
        let bytes: Vec<u8> = (1..=16).collect();
        let heap = GuidHeap::new(bytes, 0x3000);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.get(0u32), None);
        assert_eq!(heap.get(2u32), None);

        let guid = heap.get(1u32).unwrap();
        assert_eq!(guid.to_string(), "04030201-0605-0807-090a-0b0c0d0e0f10");
        assert_eq!(guid.rva, 0x3000);
    }
}
