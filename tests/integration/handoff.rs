use std::thread;

use anyhow::Result;
use bytes::Bytes;
use meshtalk_core::{DataPacket, MessageStatus};
use meshtalk_services::{run_ingress, IngressSummary};
use tokio::sync::mpsc;

use crate::*;

/// Records produced on a plain thread reach the store through the async loop.
#[tokio::test]
async fn radio_thread_to_application_task() -> Result<()> {
    let app = app();
    let (tx, rx) = mpsc::channel::<Bytes>(16);
    let ingress = tokio::spawn(run_ingress(rx, app.dispatcher.clone()));

    let radio = thread::spawn(move || {
        for id in 1..=5u32 {
            let p = inbound_text("!0000000a", &format!("msg {id}"), id);
            tx.blocking_send(Bytes::from(p.to_record().expect("encodable"))).ok();
        }
        // Same packet twice: the store keeps one.
        let dup = inbound_text("!0000000a", "msg 5", 5);
        tx.blocking_send(Bytes::from(dup.to_record().expect("encodable"))).ok();
    });
    radio.join().expect("radio thread panicked");

    let summary = ingress.await?;
    assert_eq!(
        summary,
        IngressSummary {
            dispatched: 6,
            unhandled: 0,
            malformed: 0
        }
    );

    let msgs = app.store.get("0!0000000a");
    assert_eq!(msgs.len(), 5);
    assert!(msgs.iter().all(|m| m.status == Some(MessageStatus::Received)));
    assert_eq!(msgs[2].text().as_deref(), Some("msg 3"));
    Ok(())
}

/// Ownership moves with the packet: the receiver may mutate its copy freely.
#[test]
fn packet_moves_between_threads() {
    let original = inbound_text("!0000000b", "owned", 40);
    let sent = original.clone();

    let back = thread::spawn(move || {
        let mut p = sent;
        p.status = Some(MessageStatus::Received);
        p
    })
    .join()
    .expect("consumer thread panicked");

    assert_ne!(back, original);
    assert_eq!(back.clone().with_status(original.status), original);
}

/// A corrupt record is dropped without taking the loop down.
#[tokio::test]
async fn malformed_records_do_not_stop_ingress() -> Result<()> {
    let app = app();
    let (tx, rx) = mpsc::channel::<Bytes>(4);
    let ingress = tokio::spawn(run_ingress(rx, app.dispatcher.clone()));

    let good = inbound_text("!0000000c", "after garbage", 1);
    let mut truncated = good.to_record()?;
    truncated.truncate(truncated.len() - 3);

    tx.send(Bytes::from(truncated)).await?;
    tx.send(Bytes::from(good.to_record()?)).await?;
    tx.send(Bytes::from(DataPacket::new(None, 4).to_record()?)).await?;
    drop(tx);

    let summary = ingress.await?;
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.unhandled, 1);
    assert_eq!(app.store.count("0!0000000c"), 1);
    Ok(())
}
