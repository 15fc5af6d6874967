//! Identity and addressing contract, checked end to end.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use meshtalk_core::portnum::{POSITION_APP, TEXT_MESSAGE_APP};
use meshtalk_core::{node_num_to_id, DataPacket, MessageStatus, BROADCAST_ID, BROADCAST_NUM, LOCAL_ID};

fn hash_of(p: &DataPacket) -> u64 {
    let mut h = DefaultHasher::new();
    p.hash(&mut h);
    h.finish()
}

#[test]
fn separately_built_payloads_are_one_identity() {
    let payload: Vec<u8> = (0u8..=255).collect();
    let a = DataPacket::new(Some(Bytes::from(payload.clone())), POSITION_APP).with_time(10);
    let b = DataPacket::new(Some(Bytes::copy_from_slice(&payload)), POSITION_APP).with_time(10);

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let set: HashSet<DataPacket> = [a, b].into_iter().collect();
    assert_eq!(set.len(), 1);
}

#[test]
fn round_trip_through_record_and_json() {
    let mut original = DataPacket::new(Some(Bytes::from_static(b"\x08\x01")), 67)
        .with_to(Some(node_num_to_id(0x0bad_cafe)))
        .with_from(Some(node_num_to_id(3)))
        .with_id(99)
        .with_status(Some(MessageStatus::Received))
        .with_hop_limit(1)
        .with_channel(4);
    original.error_message = Some("not carried".into());

    let from_record = DataPacket::from_record(&original.to_record().unwrap()).unwrap();
    assert_eq!(from_record, original);

    let json = serde_json::to_string(&original).unwrap();
    let from_json: DataPacket = serde_json::from_str(&json).unwrap();
    assert_eq!(from_json, original);
    assert_eq!(from_json.fingerprint(), original.fingerprint());
}

#[test]
fn text_port_gates_text_accessor() {
    let text = DataPacket::new_text(None, "hello");
    assert_eq!(text.text().as_deref(), Some("hello"));

    let same_bytes = DataPacket::new(text.bytes().cloned(), POSITION_APP);
    assert_eq!(same_bytes.text(), None);
    assert_eq!(text.data_type(), TEXT_MESSAGE_APP);
}

#[test]
fn addressing_constants() {
    assert_eq!(node_num_to_id(0x0000_0001), "!00000001");
    assert_eq!(node_num_to_id(0xffff_ffff), "!ffffffff");
    assert_eq!(node_num_to_id(BROADCAST_NUM), "!ffffffff");

    let p = DataPacket::new(None, POSITION_APP);
    assert_eq!(p.to.as_deref(), Some(BROADCAST_ID));
    assert_eq!(p.from.as_deref(), Some(LOCAL_ID));
}
