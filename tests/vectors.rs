use modbus_crc16::{compute, table, Crc16};

#[test]
fn check_string() {
    assert_eq!(compute(b"123456789"), 0x4B37);
}

#[test]
fn short_run() {
    assert_eq!(compute(b"AAAAAAAAAAAAAAAAAAAAAA"), 0xDAB3);
}

#[test]
fn bigger_chunks() {
    assert_eq!(compute(&[b'A'; 4096]), 0x4444);
    assert_eq!(compute(&vec![b'A'; 4096 * 10]), 0x9A78);
}

#[test]
fn no_data() {
    assert_eq!(compute(b""), 0xFFFF);
    assert_eq!(Crc16::new().result(), 0xFFFF);
}

#[test]
fn sixteen_mebibytes() {
    let data = vec![b'A'; 16 * 1024 * 1024];
    assert_eq!(compute(&data), 0x588F);

    let mut crc = Crc16::new();
    for chunk in data.chunks(1 << 20) {
        crc.feed(chunk);
    }
    assert_eq!(crc.result(), 0x588F);
}

#[test]
fn split_4096_across_many_calls() {
    let data = [b'A'; 4096];
    let mut crc = Crc16::new();
    let (mut start, mut step) = (0, 1);
    while start < data.len() {
        let end = (start + step).min(data.len());
        crc.feed(&data[start..end]);
        start = end;
        step = step * 2 + 1;
    }
    assert_eq!(crc.result(), 0x4444);
}

#[test]
fn repeated_calls_are_deterministic() {
    let data = b"01 03 00 00 00 0A";
    let first = compute(data);
    for _ in 0..100 {
        assert_eq!(compute(data), first);
    }
}

#[test]
fn table_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| (table()[0xFF], compute(b"123456789"))))
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), (0x4040, 0x4B37));
    }
}

#[test]
fn matches_crc_crate() {
    let reference = crc::Crc::<u16>::new(&crc::CRC_16_MODBUS);
    let cases: [&[u8]; 5] = [b"", b"123456789", b"AAAAAAAAAAAAAAAAAAAAAA", &[0xFF; 300], &[0x00; 17]];
    for data in cases {
        assert_eq!(compute(data), reference.checksum(data));
    }
}
