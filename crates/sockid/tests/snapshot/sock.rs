//! `struct sock` capture tests.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use sockid::identity::{AddressFamily, Protocol, SocketType, SocketState};
use sockid::memory::MemoryImage;
use sockid::snapshot::SockPtr;
use sockid::{NetworkIdentity, NetworkTuple};

use crate::common::{SK_BASE, SockBuilder, poisoned, snapshot, snapshot_with_protocol_size};

fn established_v4() -> SockBuilder {
    SockBuilder::new()
        .inet(Ipv4Addr::new(192, 0, 2, 1), Ipv4Addr::new(203, 0, 113, 5))
        .ports(4660, 80)
        .protocol(libc::IPPROTO_TCP as u8)
        .state(1)
        .sk_type(libc::SOCK_STREAM as u16)
        .mark(0x10)
        .priority(4)
}

#[test]
fn test_ipv4_established() {
    let record = snapshot().capture(&established_v4().image(), SockPtr::new(SK_BASE));

    assert_eq!(record.family(), AddressFamily::Inet);
    assert_eq!(record.protocol(), Protocol::Tcp);
    assert_eq!(record.tuple.source_address[..4], [192, 0, 2, 1]);
    assert_eq!(record.tuple.source_address[4..], [0; 12]);
    assert_eq!(record.tuple.dest_address[..4], [203, 0, 113, 5]);
    assert_eq!(record.tuple.dest_address[4..], [0; 12]);
    assert_eq!(record.tuple.source_port, 4660);
    assert_eq!(record.tuple.dest_port, 80);
    assert_eq!(record.state(), SocketState::Established);
    assert_eq!(record.socket_type(), SocketType::Stream);
    assert_eq!(record.mark, 0x10);
    assert_eq!(record.priority, 4);
    assert_eq!(record.raw_handle, SK_BASE);
    assert_eq!(record.pad, [0; 5]);

    assert_eq!(
        record.flow().to_string(),
        "tcp ESTAB 192.0.2.1:4660 -> 203.0.113.5:80"
    );
}

#[test]
fn test_ipv6_addresses_copied_exactly() {
    let local: Ipv6Addr = "2001:db8:0:1::10".parse().unwrap();
    let peer: Ipv6Addr = "fe80::1ff:fe23:4567:890a".parse().unwrap();
    let image = SockBuilder::new()
        .inet6(local, peer)
        .ports(443, 51000)
        .protocol(libc::IPPROTO_TCP as u8)
        .state(10)
        .image();

    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));

    assert_eq!(record.tuple.source_address, local.octets());
    assert_eq!(record.tuple.dest_address, peer.octets());
    assert_eq!(record.source_ip(), Some(IpAddr::V6(local)));
    assert_eq!(record.dest_ip(), Some(IpAddr::V6(peer)));
    assert_eq!(record.tuple.source_port, 443);
    assert_eq!(record.tuple.dest_port, 51000);
    assert_eq!(record.state(), SocketState::Listen);
}

#[test]
fn test_port_byte_order() {
    // Same numeric value in both kernel fields: skc_num host order,
    // skc_dport network order. Both come out in host order.
    let image = established_v4().ports(0x1234, 0x1234).image();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));
    assert_eq!(record.tuple.source_port, 0x1234);
    assert_eq!(record.tuple.dest_port, 0x1234);
}

#[test]
fn test_poisoned_destination_ipv4() {
    let image = established_v4().image();
    let snap = snapshot();

    let mut record = poisoned();
    snap.fill(&image, SockPtr::new(SK_BASE), &mut record);

    assert_eq!(record, snap.capture(&image, SockPtr::new(SK_BASE)));
    assert_eq!(record.tuple.source_address[4..], [0; 12]);
    assert_eq!(record.tuple.dest_address[4..], [0; 12]);
    assert_eq!(record.pad, [0; 5]);
}

#[test]
fn test_poisoned_destination_ipv6() {
    let image = SockBuilder::new()
        .inet6(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST)
        .ports(8080, 40000)
        .image();
    let snap = snapshot();

    let mut record = poisoned();
    snap.fill(&image, SockPtr::new(SK_BASE), &mut record);

    assert_eq!(record, snap.capture(&image, SockPtr::new(SK_BASE)));
}

#[test]
fn test_unknown_family_normalised() {
    let image = SockBuilder::filled()
        .family(libc::AF_UNIX as u16)
        .protocol(0)
        .state(7)
        .sk_type(libc::SOCK_DGRAM as u16)
        .mark(3)
        .priority(9)
        .image();

    let mut record = poisoned();
    snapshot().fill(&image, SockPtr::new(SK_BASE), &mut record);

    assert_eq!(record.tuple, NetworkTuple::default());
    assert_eq!(record.family(), AddressFamily::Unspec);
    assert_eq!(record.state(), SocketState::Close);
    assert_eq!(record.socket_type(), SocketType::Dgram);
    assert_eq!(record.mark, 3);
    assert_eq!(record.priority, 9);
    assert_eq!(record.raw_handle, SK_BASE);
    assert_eq!(record.pad, [0; 5]);
    assert_eq!(record.flow().to_string(), "ip UNCONN unspec *");
}

#[test]
fn test_unknown_family_keeps_protocol() {
    let image = SockBuilder::new()
        .family(libc::AF_NETLINK as u16)
        .protocol(libc::NETLINK_GENERIC as u8)
        .ports(1, 2)
        .image();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));

    assert_eq!(record.family(), AddressFamily::Unspec);
    assert_eq!(record.tuple.protocol, libc::NETLINK_GENERIC as u16);
    assert_eq!(record.tuple.source_port, 0);
    assert_eq!(record.tuple.dest_port, 0);
}

#[test]
fn test_word_protocol() {
    let image = established_v4()
        .word_protocol()
        .protocol(libc::IPPROTO_UDP as u8)
        .image();
    let record = snapshot_with_protocol_size(4).capture(&image, SockPtr::new(SK_BASE));
    assert_eq!(record.protocol(), Protocol::Udp);
}

#[test]
fn test_native_protocol_not_shifted() {
    let image = established_v4().protocol(libc::IPPROTO_SCTP as u8).image();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));
    assert_eq!(record.tuple.protocol, libc::IPPROTO_SCTP as u16);
}

#[test]
fn test_only_ipv4_bytes_read() {
    // Bytes around the IPv4 fields are 0xff; none of them may leak.
    let image = SockBuilder::filled()
        .inet(Ipv4Addr::new(10, 1, 2, 3), Ipv4Addr::new(10, 4, 5, 6))
        .image();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));

    assert_eq!(record.source_ip(), Some(IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3))));
    assert_eq!(record.dest_ip(), Some(IpAddr::V4(Ipv4Addr::new(10, 4, 5, 6))));
    assert_eq!(record.tuple.source_address[4..], [0; 12]);
    assert_eq!(record.tuple.dest_address[4..], [0; 12]);
}

#[test]
fn test_idempotent() {
    let image = established_v4().image();
    let snap = snapshot();

    let mut record = NetworkIdentity::zeroed();
    snap.fill(&image, SockPtr::new(SK_BASE), &mut record);
    let first = record;
    snap.fill(&image, SockPtr::new(SK_BASE), &mut record);

    assert_eq!(record, first);
    assert_eq!(record.as_bytes(), first.as_bytes());
}

#[test]
fn test_unmapped_handle() {
    let mut record = poisoned();
    snapshot().fill(&MemoryImage::empty(), SockPtr::new(SK_BASE), &mut record);

    assert_eq!(
        record,
        NetworkIdentity {
            raw_handle: SK_BASE,
            ..NetworkIdentity::zeroed()
        }
    );
}

#[test]
fn test_partially_mapped_socket() {
    // Only sock_common is mapped; sk_mark, sk_priority, sk_protocol and
    // sk_type fault and read as zero.
    let sock = established_v4();
    let image = MemoryImage::builder()
        .region(SK_BASE, sock.bytes()[..128].to_vec())
        .build();
    let record = snapshot().capture(&image, SockPtr::new(SK_BASE));

    assert_eq!(record.family(), AddressFamily::Inet);
    assert_eq!(record.tuple.source_address[..4], [192, 0, 2, 1]);
    assert_eq!(record.tuple.dest_port, 80);
    assert_eq!(record.tuple.protocol, 0);
    assert_eq!(record.socket_type, 0);
    assert_eq!(record.mark, 0);
    assert_eq!(record.priority, 0);
}

#[test]
fn test_handle_near_top_of_address_space() {
    let mut record = poisoned();
    snapshot().fill(&MemoryImage::empty(), SockPtr::new(u64::MAX - 8), &mut record);

    assert_eq!(record.family(), AddressFamily::Unspec);
    assert_eq!(record.raw_handle, u64::MAX - 8);
    assert_eq!(record.mark, 0);
}
