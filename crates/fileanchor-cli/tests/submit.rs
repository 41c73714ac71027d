//! Drives the assembled production pipeline from environment-style
//! configuration against wiremock servers.

use std::collections::HashMap;

use fileanchor_cli::exit::{EXIT_FILE_UNREADABLE, EXIT_LEDGER};
use fileanchor_cli::{build_pipeline, exit_code, render_receipt, AppConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

fn config_for(ipfs: &MockServer, node: &MockServer) -> AppConfig {
    let ipfs_addr = ipfs.address();
    let vars: HashMap<&str, String> = HashMap::from([
        ("IPFS_HOST", ipfs_addr.ip().to_string()),
        ("IPFS_PORT", ipfs_addr.port().to_string()),
        ("IPFS_PROTOCOL", "http".to_string()),
        ("BLOCKCHAIN_NODE_URL", node.uri()),
        ("SMART_CONTRACT_ADDRESS", CONTRACT.to_string()),
        ("LEDGER_RECEIPT_TIMEOUT_SECS", "5".to_string()),
        ("LEDGER_POLL_INTERVAL_MS", "10".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("config")
}

async fn mount_ipfs(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Name": "hello.txt",
            "Hash": "QmT78zSuBmuS4z925WZfrqQ1qHaJ56DQaTfyMUF7F8ff5o",
            "Size": "19"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn prints_transaction_id_on_success() {
    let ipfs = MockServer::start().await;
    let node = MockServer::start().await;
    mount_ipfs(&ipfs).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_sendTransaction" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 1, "result": "0xabc"
        })))
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getTransactionReceipt" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0", "id": 2, "result": { "status": "0x1", "blockNumber": "0x1" }
        })))
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hello.txt");
    std::fs::write(&file, b"hello-world").unwrap();

    let pipeline = build_pipeline(config_for(&ipfs, &node)).unwrap();
    let receipt = pipeline.submit(&file, SENDER).await.unwrap();
    assert_eq!(render_receipt(&receipt, false).unwrap(), "0xabc");
}

#[tokio::test]
async fn ledger_rejection_maps_to_ledger_exit_code() {
    let ipfs = MockServer::start().await;
    let node = MockServer::start().await;
    mount_ipfs(&ipfs).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        })))
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hello.txt");
    std::fs::write(&file, b"hello-world").unwrap();

    let pipeline = build_pipeline(config_for(&ipfs, &node)).unwrap();
    let err = pipeline.submit(&file, SENDER).await.unwrap_err();
    assert_eq!(exit_code(&err), EXIT_LEDGER);
}

#[tokio::test]
async fn missing_file_maps_to_file_exit_code() {
    let ipfs = MockServer::start().await;
    let node = MockServer::start().await;

    let pipeline = build_pipeline(config_for(&ipfs, &node)).unwrap();
    let err = pipeline
        .submit("/nonexistent/fileanchor/input.bin", SENDER)
        .await
        .unwrap_err();
    assert_eq!(exit_code(&err), EXIT_FILE_UNREADABLE);
}
