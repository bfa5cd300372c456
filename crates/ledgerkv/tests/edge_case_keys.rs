//! Binary-safety coverage across the key shapes the original system's test
//! suite exercised: empty, whitespace, NUL bytes, control characters, high
//! bytes, UTF-8, and a large key near a page boundary.

use ledgerkv::{LogStore, StorageEngine};
use test_case::test_case;

#[test_case(b"" ; "empty key")]
#[test_case(b" " ; "single space key")]
#[test_case(b"  leading and trailing  " ; "whitespace not trimmed")]
#[test_case(b"key\x00with\x00nulls" ; "embedded nul bytes")]
#[test_case(b"\xde\xad\xbe\xef" ; "purely binary key")]
#[test_case(b"key\nwith\r\nnewlines" ; "control characters")]
#[test_case(b"\xff\xfe\xfd" ; "high byte values")]
#[test_case(b"A" ; "single byte key")]
#[test_case("chave-com-acentuacao-ç".as_bytes() ; "utf8 key")]
fn set_then_get_roundtrips_for_edge_case_key(key: &[u8]) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open_path(dir.path().join("log.db")).unwrap();

    store.set(key, b"value").unwrap();
    assert_eq!(store.get(key).unwrap(), b"value");
}

#[test]
fn four_kilobyte_key_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open_path(dir.path().join("log.db")).unwrap();

    let key = vec![b'A'; 4096];
    store.set(&key, b"value").unwrap();
    assert_eq!(store.get(&key).unwrap(), b"value");
}

#[test]
fn large_single_record_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LogStore::open_path(dir.path().join("log.db")).unwrap();

    let value = vec![0x5au8; 1 << 20];
    store.set(b"big", &value).unwrap();
    assert_eq!(store.get(b"big").unwrap(), value);
}
