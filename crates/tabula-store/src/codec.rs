//! On-disk document encoding.
//!
//! Records are UTF-8 JSON indented with one tab per level and terminated by
//! a single newline.

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{StoreError, StoreResult};

const INDENT: &[u8] = b"\t";

/// Encode a document into its canonical stored form.
///
/// A value JSON cannot represent is reported as [`StoreError::Io`] with
/// [`io::ErrorKind::InvalidData`].
pub fn encode_document<T: Serialize + ?Sized>(document: &T) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    document
        .serialize(&mut ser)
        .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decode stored bytes into the caller's shape.
pub fn decode_document<T: DeserializeOwned>(bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn tab_indented_with_trailing_newline() {
        let bytes = encode_document(&Point { x: 1, y: 2 }).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\n\t\"x\": 1,\n\t\"y\": 2\n}\n");
    }

    #[test]
    fn nested_levels_use_one_tab_each() {
        let mut inner = BTreeMap::new();
        inner.insert("k", vec![1]);
        let mut outer = BTreeMap::new();
        outer.insert("inner", inner);

        let text = String::from_utf8(encode_document(&outer).unwrap()).unwrap();
        assert!(text.contains("\n\t\t\"k\": [\n\t\t\t1\n\t\t]"));
        assert!(text.ends_with("}\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn scalar_documents_are_allowed() {
        assert_eq!(encode_document(&42).unwrap(), b"42\n");
        assert_eq!(encode_document("hi").unwrap(), b"\"hi\"\n");
    }

    #[test]
    fn unserializable_value_is_io_error() {
        // Non-string map keys cannot be represented in JSON.
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        let err = encode_document(&map).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Io(ref e) if e.kind() == io::ErrorKind::InvalidData
        ));
    }

    #[test]
    fn invalid_json_is_deserialization_error() {
        let err = decode_document::<Point>(b"{\"x\": 1,").unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }

    #[test]
    fn shape_mismatch_is_deserialization_error() {
        let err = decode_document::<Point>(b"{\"x\": \"one\", \"y\": 2}").unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }
}
