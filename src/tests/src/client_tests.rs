//! Tests for the connection layer against the fake node.

use crate::fake_node::{FakeNode, BLOCK_HASH_BYTES};
use serde_json::json;
use shell_client::transaction::{Action, Transaction};
use shell_client::{connect, ClientError, Connection, ConnectionConfig, FileKeyStore};
use shell_core::{CoreError, KeyPair, KeyType};
use tempfile::{tempdir, TempDir};

async fn connect_to(node: &FakeNode) -> (Connection, TempDir) {
    let dir = tempdir().unwrap();
    let config = ConnectionConfig {
        network_id: "local".to_string(),
        node_url: node.url(),
        key_store_dir: dir.path().to_path_buf(),
        key_path: None,
    };
    (connect(&config).await.unwrap(), dir)
}

#[tokio::test]
async fn test_account_state() {
    let node = FakeNode::start();
    node.add_account("alice.near", 1_500_000_000_000_000_000_000_000);
    let (near, _dir) = connect_to(&node).await;

    let state = near.account("alice.near").state().await.unwrap();
    assert_eq!(state.amount, "1500000000000000000000000");
    assert_eq!(state.amount_yocto(), Some(1_500_000_000_000_000_000_000_000));
    assert_eq!(state.storage_usage, 182);
}

#[tokio::test]
async fn test_missing_account_is_rpc_error() {
    let node = FakeNode::start();
    let (near, _dir) = connect_to(&node).await;

    match near.account("ghost.near").state().await {
        Err(ClientError::Rpc { code, message }) => {
            assert_eq!(code, -32000);
            assert!(message.contains("ghost.near"));
        }
        other => panic!("expected an RPC error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_access_keys() {
    let node = FakeNode::start();
    node.add_account("alice.near", 1);
    let key = KeyPair::from_random(KeyType::Ed25519);
    node.add_key("alice.near", &key.public_key(), 5);
    let (near, _dir) = connect_to(&node).await;

    let keys = near.account("alice.near").get_access_keys().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].public_key, key.public_key());
    assert_eq!(keys[0].access_key.nonce, 5);
}

#[tokio::test]
async fn test_view_function() {
    let node = FakeNode::start();
    node.set_view_result("counter.near", "get_num", json!({ "num": 3 }));
    let (near, _dir) = connect_to(&node).await;

    let result = near
        .account("register.near")
        .view_function("counter.near", "get_num", &json!({}))
        .await
        .unwrap();
    assert_eq!(result, json!({ "num": 3 }));
}

#[tokio::test]
async fn test_authorize_key_stores_authorized_key() {
    let node = FakeNode::start();
    node.add_account("alice.near", 1);
    let key = KeyPair::from_random(KeyType::Ed25519);
    node.add_key("alice.near", &key.public_key(), 0);
    let (near, dir) = connect_to(&node).await;

    near.account("alice.near").authorize_key(&key).await.unwrap();

    let stored = FileKeyStore::new(dir.path())
        .get_key("local", "alice.near")
        .unwrap()
        .unwrap();
    assert_eq!(stored.public_key(), key.public_key());
}

#[tokio::test]
async fn test_authorize_key_rejects_unknown_key() {
    let node = FakeNode::start();
    node.add_account("alice.near", 1);
    node.add_key("alice.near", &KeyPair::from_random(KeyType::Ed25519).public_key(), 0);
    let (near, dir) = connect_to(&node).await;

    let key = KeyPair::from_random(KeyType::Ed25519);
    let result = near.account("alice.near").authorize_key(&key).await;
    assert!(matches!(result, Err(ClientError::KeyNotAuthorized { .. })));
    assert!(FileKeyStore::new(dir.path())
        .get_key("local", "alice.near")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_send_money_signs_with_stored_key() {
    let node = FakeNode::start();
    node.add_account("alice.near", 10);
    node.add_account("bob.near", 0);
    let key = KeyPair::from_random(KeyType::Ed25519);
    node.add_key("alice.near", &key.public_key(), 41);
    let (near, dir) = connect_to(&node).await;
    FileKeyStore::new(dir.path()).set_key("local", "alice.near", &key).unwrap();

    let outcome = near.account("alice.near").send_money("bob.near", 7).await.unwrap();
    assert_eq!(outcome["status"], json!({ "SuccessValue": "" }));

    // ed25519 signatures are deterministic, so the whole payload can be rebuilt
    let expected = Transaction::new(
        "alice.near",
        &key.public_key(),
        42,
        "bob.near",
        BLOCK_HASH_BYTES,
        vec![Action::Transfer { deposit: 7 }],
    )
    .sign(&key)
    .unwrap()
    .to_base64()
    .unwrap();
    assert_eq!(node.transactions(), vec![expected]);
}

#[tokio::test]
async fn test_send_money_without_key() {
    let node = FakeNode::start();
    node.add_account("alice.near", 10);
    let (near, _dir) = connect_to(&node).await;

    let result = near.account("alice.near").send_money("bob.near", 1).await;
    assert!(matches!(result, Err(ClientError::MissingKey { .. })));
    assert!(node.transactions().is_empty());
}

#[tokio::test]
async fn test_signer_id_cannot_leave_key_store() {
    let node = FakeNode::start();
    let (near, dir) = connect_to(&node).await;

    // A key file outside the store that a traversing id would reach
    let key = KeyPair::from_random(KeyType::Ed25519);
    FileKeyStore::new(dir.path().join("elsewhere"))
        .set_key("local", "x", &key)
        .unwrap();

    let result = near
        .account("../elsewhere/local/x")
        .send_money("bob.near", 1)
        .await;
    assert!(matches!(
        result,
        Err(ClientError::Core(CoreError::InvalidAccountId { .. }))
    ));
    assert!(node.transactions().is_empty());
}
