//! Shared snapshots across threads.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;

use sockid::memory::MemoryImage;
use sockid::snapshot::SockPtr;

use crate::common::{SockBuilder, snapshot};

const SOCKETS: u16 = 16;
const SOCK_STRIDE: u64 = 0x1000;
const BASE: u64 = 0xffff_8882_0000_0000;

#[test]
fn test_concurrent_captures() {
    let mut builder = MemoryImage::builder();
    for i in 0..SOCKETS {
        let sock = SockBuilder::new()
            .inet(Ipv4Addr::new(10, 0, 0, i as u8), Ipv4Addr::new(10, 0, 1, i as u8))
            .ports(20000 + i, 443)
            .protocol(libc::IPPROTO_TCP as u8)
            .mark(u32::from(i));
        builder = builder.region(BASE + u64::from(i) * SOCK_STRIDE, sock.bytes().to_vec());
    }
    let image = Arc::new(builder.build());
    let snap = snapshot();

    let handles: Vec<_> = (0..SOCKETS)
        .map(|i| {
            let image = Arc::clone(&image);
            thread::spawn(move || {
                let sk = SockPtr::new(BASE + u64::from(i) * SOCK_STRIDE);
                (0..100)
                    .map(|_| snap.capture(&*image, sk))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let records = handle.join().unwrap();
        let first = records[0];
        assert!(records.iter().all(|r| *r == first));
        assert_eq!(first.tuple.source_address[..4], [10, 0, 0, i as u8]);
        assert_eq!(first.tuple.dest_address[..4], [10, 0, 1, i as u8]);
        assert_eq!(first.tuple.source_port, 20000 + i as u16);
        assert_eq!(first.mark, i as u32);
    }
}
