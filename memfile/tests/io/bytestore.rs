use memfile::io::{ByteStore, StoreConfig, StoreError};
use std::thread;

#[test]
fn test_growth_on_write() {
    for (initial, index) in [(0usize, 0usize), (0, 5), (3, 3), (3, 10), (8, 100)] {
        let store = ByteStore::from_bytes(&vec![0xAA; initial]);
        store.write_byte(index, 0x42).unwrap();

        assert_eq!(store.size(), index + 1, "initial={initial} index={index}");
        let content = store.to_vec();
        assert!(content[..initial].iter().all(|&b| b == 0xAA));
        assert!(content[initial..index].iter().all(|&b| b == 0));
        assert_eq!(content[index], 0x42);
    }
}

#[test]
fn test_write_at_index_five_on_empty_store() {
    let store = ByteStore::new();
    store.write_byte(5, 7).unwrap();
    assert_eq!(store.to_vec(), vec![0, 0, 0, 0, 0, 7]);
}

#[test]
fn test_bulk_write_fills_gap() {
    let store = ByteStore::from_bytes(b"ab");
    assert_eq!(store.write(4, b"cd").unwrap(), 2);
    assert_eq!(store.to_vec(), vec![b'a', b'b', 0, 0, b'c', b'd']);
}

#[test]
fn test_bulk_write_across_end() {
    let store = ByteStore::from_bytes(b"abcd");
    store.write(2, b"XYZ").unwrap();
    assert_eq!(store.to_vec(), b"abXYZ");
}

#[test]
fn test_append_returns_offset() {
    let store = ByteStore::from_bytes(b"abc");
    assert_eq!(store.append(b"de").unwrap(), 3);
    assert_eq!(store.append_byte(b'f').unwrap(), 5);
    assert_eq!(store.to_vec(), b"abcdef");
}

#[test]
fn test_short_read_near_end() {
    let store = ByteStore::from_bytes(b"hello");
    let mut buf = [0u8; 8];

    assert_eq!(store.read(3, &mut buf), Some(2));
    assert_eq!(&buf[..2], b"lo");
    assert_eq!(store.read(5, &mut buf), None);
    assert_eq!(store.read(42, &mut buf), None);
    assert_eq!(store.read_byte(4), Some(b'o'));
    assert_eq!(store.read_byte(5), None);
}

#[test]
fn test_truncate_never_grows() {
    let store = ByteStore::from_bytes(b"hello");

    assert!(!store.truncate(10));
    assert_eq!(store.size(), 5);
    assert!(!store.truncate(5));

    assert!(store.truncate(2));
    assert_eq!(store.to_vec(), b"he");

    // bytes past the new end are gone for good
    store.write_byte(4, b'!').unwrap();
    assert_eq!(store.to_vec(), vec![b'h', b'e', 0, 0, b'!']);
}

#[test]
fn test_size_limit() {
    let store = ByteStore::with_config(
        StoreConfig::default()
            .with_initial_capacity(16)
            .with_max_size(4),
    );
    assert_eq!(store.max_size(), Some(4));

    store.write(0, b"abcd").unwrap();
    assert_eq!(
        store.write_byte(4, b'e'),
        Err(StoreError::Full {
            requested: 5,
            limit: 4
        })
    );
    assert_eq!(
        store.append_byte(b'e'),
        Err(StoreError::Full {
            requested: 5,
            limit: 4
        })
    );
    // overwriting inside the limit is fine
    store.write(1, b"BC").unwrap();
    assert_eq!(store.to_vec(), b"aBCd");
}

#[test]
fn test_transfer_to() {
    let store = ByteStore::from_bytes(b"hello world");
    let mut sink = Vec::new();

    assert_eq!(store.transfer_to(6, 100, &mut sink).unwrap(), 5);
    assert_eq!(sink, b"world");
    assert_eq!(store.transfer_to(11, 3, &mut sink).unwrap(), 0);
}

#[test]
fn test_transfer_from() {
    let store = ByteStore::from_bytes(b"ab");
    let mut source: &[u8] = b"xyz123";

    assert_eq!(store.transfer_from(&mut source, 4, 3).unwrap(), 3);
    assert_eq!(store.to_vec(), vec![b'a', b'b', 0, 0, b'x', b'y', b'z']);
    assert_eq!(source, b"123");

    let mut empty: &[u8] = b"";
    assert_eq!(store.transfer_from(&mut empty, 20, 3).unwrap(), 0);
    assert_eq!(store.size(), 7);
}

#[test]
fn test_transfer_from_unsized_source() {
    use std::io::Read;

    let store = ByteStore::new();
    let mut bytes: &[u8] = b"dyn source";
    let source: &mut dyn Read = &mut bytes;

    assert_eq!(store.transfer_from(source, 0, 3).unwrap(), 3);
    assert_eq!(store.to_vec(), b"dyn");
    assert_eq!(bytes, b" source");
}

#[test]
fn test_transfer_from_full_store() {
    let store = ByteStore::with_config(StoreConfig::default().with_max_size(2));
    let mut source: &[u8] = b"xyz";

    let err = store.transfer_from(&mut source, 0, 3).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::StorageFull);
    assert!(store.is_empty());
}

#[test]
fn test_concurrent_appends_stay_contiguous() {
    const THREADS: u8 = 4;
    const RECORDS: u8 = 100;
    const RECORD_LEN: usize = 8;

    let store = ByteStore::new();
    thread::scope(|s| {
        for tid in 0..THREADS {
            let store = store.clone();
            s.spawn(move || {
                for seq in 0..RECORDS {
                    let mut record = [tid; RECORD_LEN];
                    record[1] = seq;
                    store.append(&record).unwrap();
                }
            });
        }
    });

    let content = store.to_vec();
    assert_eq!(
        content.len(),
        usize::from(THREADS) * usize::from(RECORDS) * RECORD_LEN
    );

    let mut next_seq = [0u8; THREADS as usize];
    for record in content.chunks(RECORD_LEN) {
        let tid = record[0];
        assert!(record.iter().enumerate().all(|(i, &b)| i == 1 || b == tid));
        assert_eq!(record[1], next_seq[usize::from(tid)]);
        next_seq[usize::from(tid)] += 1;
    }
    assert!(next_seq.iter().all(|&n| n == RECORDS));
}

#[test]
fn test_concurrent_writers_never_expose_garbage() {
    let store = ByteStore::new();
    thread::scope(|s| {
        let writer = store.clone();
        s.spawn(move || {
            for i in (0..2000).step_by(7) {
                writer.write_byte(i, 1).unwrap();
            }
        });
        let reader = store.clone();
        s.spawn(move || {
            for _ in 0..200 {
                let guard = reader.lock();
                assert!(guard.iter().all(|&b| b == 0 || b == 1));
            }
        });
    });
    assert_eq!(store.size(), 1996);
}
