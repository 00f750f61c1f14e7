//! Discovery followed by signing through the façade crate

use ethereum_types::{H256, U256};
use trezor_bridge::prelude::*;

fn layout() -> SignatureLayout {
    SignatureLayout::VLast
}

#[tokio::test]
async fn pick_account_then_sign_transaction() {
    let _ = trezor_bridge::init_logging_from_env();

    let config = SignerConfig::from_toml_str(
        "hd_path = \"m/44'/60'/0'/0\"\nsignature_layout = \"v-last\"\ndefault_chain_id = 4",
    )
    .unwrap();
    let signature = Signature::new(28, H256::repeat_byte(0xaa), H256::repeat_byte(0xbb));
    let device = SimulatedDevice::new(config.signature_layout).with_signature(signature);
    let session = DeviceSession::open(&device).await.unwrap();

    let accounts = DiscoveryClient::new(session.clone())
        .resolve_window(&config.hd_path, 0, DEFAULT_WINDOW_SIZE)
        .await
        .unwrap();
    let picked = &accounts[3];
    assert_eq!(picked.path.to_string(), "m/44'/60'/0'/0/3");

    let account = AccountReference::new("picked", picked.address, picked.path.clone());
    let client = SigningClient::for_account(session, &account, config.signature_layout);

    let request = RawTransaction::from_json(r#"{"nonce": 0, "gas": 21000, "gasPrice": "0x3b9aca00"}"#)
        .unwrap()
        .into_request(config.default_chain_id)
        .unwrap();
    match &request {
        TransactionRequest::StaticFee(tx) => assert_eq!(tx.gas_price, U256::from(1_000_000_000u64)),
        other => panic!("unexpected request: {other:?}"),
    }

    assert_eq!(client.sign_transaction(&request).await.unwrap(), signature);
    assert_eq!(device.safety_level(), SafetyCheckLevel::Strict);
    assert_eq!(device.safety_changes().len(), 2);
}

#[tokio::test]
async fn signing_request_variants_dispatch_through_one_entry_point() {
    let device = SimulatedDevice::new(layout());
    let session = DeviceSession::open(&device).await.unwrap();
    let client = SigningClient::new(session, HdPath::parse("m/44'/1'/0'/0/0").unwrap(), layout());

    let requests = vec![
        SigningRequest::PersonalMessage(b"gm".to_vec()),
        SigningRequest::TypedDataHash {
            domain_hash: H256::repeat_byte(1),
            message_hash: H256::repeat_byte(2),
        },
        SigningRequest::StaticFee(StaticFeeTransaction {
            gas_price: U256::one(),
            gas_limit: U256::from(21000),
            chain_id: 1,
            ..Default::default()
        }),
        SigningRequest::DynamicFee(DynamicFeeTransaction {
            max_fee_per_gas: U256::from(2),
            max_priority_fee_per_gas: U256::one(),
            gas_limit: U256::from(21000),
            chain_id: 1,
            ..Default::default()
        }),
    ];
    for request in &requests {
        client.sign(request).await.unwrap();
    }
    assert_eq!(device.calls().len(), requests.len());
    assert!(device.safety_changes().is_empty());
}

#[test]
fn hd_paths_are_reexported() {
    let base = HdBasePath::default();
    assert_eq!(derive_account(base.as_path(), 1).unwrap().to_string(), "m/44'/60'/0'/0/1");
    assert!(matches!(
        HdPath::parse("44'/60'/0'/0"),
        Err(HdPathError::InvalidPathFormat { .. })
    ));
}
