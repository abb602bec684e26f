//! Wire bytes of captured records.

use std::net::Ipv4Addr;

use sockid::NetworkIdentity;
use sockid::snapshot::SockPtr;

use crate::common::{SK_BASE, SockBuilder, snapshot};

#[test]
fn test_captured_record_wire_bytes() {
    let image = SockBuilder::new()
        .inet(Ipv4Addr::new(192, 0, 2, 1), Ipv4Addr::new(203, 0, 113, 5))
        .ports(4660, 80)
        .protocol(libc::IPPROTO_TCP as u8)
        .state(1)
        .sk_type(libc::SOCK_STREAM as u16)
        .mark(0xdead_beef)
        .priority(2)
        .image();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));
    let bytes = record.as_bytes();

    assert_eq!(bytes.len(), 64);
    assert_eq!(bytes[0..4], [192, 0, 2, 1]);
    assert_eq!(bytes[16..20], [203, 0, 113, 5]);
    assert_eq!(bytes[32..34], 4660u16.to_ne_bytes());
    assert_eq!(bytes[34..36], 80u16.to_ne_bytes());
    assert_eq!(bytes[36..38], 6u16.to_ne_bytes());
    assert_eq!(bytes[38..40], (libc::AF_INET as u16).to_ne_bytes());
    assert_eq!(bytes[40..48], SK_BASE.to_ne_bytes());
    assert_eq!(bytes[48..52], 0xdead_beefu32.to_ne_bytes());
    assert_eq!(bytes[52..56], 2u32.to_ne_bytes());
    assert_eq!(bytes[56..58], 1u16.to_ne_bytes());
    assert_eq!(bytes[58], 1);
    assert_eq!(bytes[59..64], [0; 5]);

    assert_eq!(NetworkIdentity::from_bytes(bytes).unwrap(), record);
}
