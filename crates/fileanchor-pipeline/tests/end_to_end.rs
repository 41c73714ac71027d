//! End-to-end submission through the HTTP adapters, with wiremock standing
//! in for the IPFS API and the EVM node.

use std::sync::Arc;
use std::time::Duration;

use fileanchor_core::{
    EventKind, HandlerError, LifecycleBus, LifecycleEvent, Stage, SubmissionError, TxStatus,
};
use fileanchor_ledger::{ContractInterface, EvmLedger, LedgerConfig};
use fileanchor_pipeline::SubmissionPipeline;
use fileanchor_store::{IpfsHttpStore, StoreConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CID: &str = "QmT78zSuBmuS4z925WZfrqQ1qHaJ56DQaTfyMUF7F8ff5o";
const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const SENDER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
const TX_HASH: &str = "0x1f1e5bd7e1e4de4dc6bd0b1a0bb0ac4cbc16c8a8d9b2e1ce3c1c1b5f1ddf7e01";

fn pipeline(ipfs: &MockServer, node: &MockServer) -> SubmissionPipeline<IpfsHttpStore, EvmLedger> {
    let store = IpfsHttpStore::new(StoreConfig::from_url(&ipfs.uri()).unwrap()).unwrap();
    let config = LedgerConfig::from_url(&node.uri(), CONTRACT)
        .unwrap()
        .with_receipt_polling(Duration::from_secs(5), Duration::from_millis(10));
    let ledger = EvmLedger::new(config).unwrap();
    SubmissionPipeline::new(store, ledger, Arc::new(LifecycleBus::with_logging()))
}

#[tokio::test]
async fn file_is_pinned_and_its_cid_recorded_on_chain() {
    let ipfs = MockServer::start().await;
    let node = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Name": "hello.txt",
            "Hash": CID,
            "Size": "19"
        })))
        .expect(1)
        .mount(&ipfs)
        .await;

    let data = ContractInterface::store_hash().encode_call_hex(CID);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_sendTransaction",
            "params": [{ "from": SENDER, "to": CONTRACT, "data": data }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": TX_HASH
        })))
        .expect(1)
        .mount(&node)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getTransactionReceipt" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "result": { "transactionHash": TX_HASH, "status": "0x1", "blockNumber": "0x7" }
        })))
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hello.txt");
    std::fs::write(&file, b"hello-world").unwrap();

    let receipt = pipeline(&ipfs, &node)
        .submit(&file, SENDER)
        .await
        .expect("submission");

    assert_eq!(receipt.tx_id, TX_HASH);
    assert_eq!(receipt.status, TxStatus::Success);
    assert_eq!(receipt.address.as_str(), CID);
    assert_eq!(receipt.block_number, Some(7));
}

#[tokio::test]
async fn store_outage_sends_nothing_to_the_node() {
    let ipfs = MockServer::start().await;
    let node = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ipfs)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&node)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hello.txt");
    std::fs::write(&file, b"hello-world").unwrap();

    let pipeline = pipeline(&ipfs, &node);
    let failed = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&failed);
    pipeline.bus().subscribe(
        EventKind::Failed,
        move |ev: &LifecycleEvent| -> Result<(), HandlerError> {
            if let LifecycleEvent::Failed { stage, .. } = ev {
                *sink.lock() = Some(*stage);
            }
            Ok(())
        },
    );

    let err = pipeline.submit(&file, SENDER).await.unwrap_err();
    assert!(matches!(err, SubmissionError::StoreUnavailable(_)));
    assert_eq!(*failed.lock(), Some(Stage::Storing));
}
