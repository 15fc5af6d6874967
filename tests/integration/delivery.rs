use anyhow::Result;
use meshtalk_core::config::MeshtalkConfig;
use meshtalk_core::MessageStatus;
use meshtalk_services::{run_status_reports, StatusReport};
use tokio::sync::mpsc;

use crate::*;

/// Compose, then let the transport walk the packet to DELIVERED.
#[tokio::test]
async fn outgoing_message_is_delivered() -> Result<()> {
    let app = app();
    let sent = app.text.compose(Some("!0000abcd".into()), "are you there")?;
    assert_eq!(sent.status, Some(MessageStatus::Queued));

    let (tx, rx) = mpsc::channel(4);
    let reports = tokio::spawn(run_status_reports(rx, app.tracker.clone()));
    tx.send(StatusReport::new(sent.id, MessageStatus::Enroute)).await?;
    tx.send(StatusReport::new(sent.id, MessageStatus::Delivered)).await?;
    drop(tx);

    assert_eq!(reports.await?, 2);
    let stored = app.store.find_by_id(sent.id).expect("composed packet stored");
    assert_eq!(stored.status, Some(MessageStatus::Delivered));
    assert_eq!(stored.error_message, None);
    Ok(())
}

/// A nak leaves ERROR plus the reason; the reason is not identity.
#[tokio::test]
async fn outgoing_message_fails() -> Result<()> {
    let app = app();
    let sent = app.text.compose(None, "into the void")?;

    assert!(app.tracker.apply(StatusReport::new(sent.id, MessageStatus::Enroute)));
    assert!(app.tracker.apply(StatusReport::failed(sent.id, "NO_ROUTE")));

    let stored = app.store.find_by_id(sent.id).expect("composed packet stored");
    assert_eq!(stored.status, Some(MessageStatus::Error));
    assert_eq!(stored.error_message.as_deref(), Some("NO_ROUTE"));

    let mut expected = sent.with_status(Some(MessageStatus::Error));
    expected.error_message = None;
    assert_eq!(stored, expected);
    Ok(())
}

/// Config drives the outgoing defaults and the store cap.
#[test]
fn config_shapes_composed_packets() -> Result<()> {
    let config = MeshtalkConfig::from_toml_str(
        "[packets]\ndefault_hop_limit = 6\ndefault_channel = 2\n\n[store]\nmax_messages_per_contact = 2\n",
    )?;
    let app = app_with(config);

    let mut ids = Vec::new();
    for n in 0..3 {
        let p = app.text.compose(Some("!00000042".into()), &format!("n{n}"))?;
        assert_eq!(p.hop_limit, 6);
        assert_eq!(p.channel, 2);
        ids.push(p.id);
    }

    let kept: Vec<u32> = app.store.get("2!00000042").iter().map(|p| p.id).collect();
    assert_eq!(kept, ids[1..].to_vec());
    Ok(())
}
