//! Concurrency tests: the daily cap and cooldowns hold under parallel load.

use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;
use common::{start_faucet, test_config, TESTNET};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cap_holds_under_concurrent_requests() {
    let faucet = Arc::new(start_faucet(test_config(100, 1000, 3600)).await);
    faucet.node.send_delay_ms.store(20, Ordering::SeqCst);

    let mut handles = Vec::new();
    for i in 0..50 {
        let faucet = faucet.clone();
        handles.push(tokio::spawn(async move {
            faucet.request(&format!("cosmos1load{:04}", i), TESTNET).await
        }));
    }

    let mut success = 0;
    let mut capped = 0;
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, 200);
        match body["status"].as_str() {
            Some("success") => success += 1,
            Some("fail") => {
                assert_eq!(body["message"], "The daily cap for this faucet has been reached");
                capped += 1;
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    assert_eq!(success, 10);
    assert_eq!(capped, 40);
    assert_eq!(faucet.node.sends.load(Ordering::SeqCst), 10);
    assert_eq!(faucet.faucet.engine().usage(TESTNET).unwrap().day_tally, 1000);
    assert_eq!(faucet.log_lines().len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_address_hammered() {
    let faucet = Arc::new(start_faucet(test_config(100, 100_000, 3600)).await);
    faucet.node.send_delay_ms.store(50, Ordering::SeqCst);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let faucet = faucet.clone();
        handles.push(tokio::spawn(async move {
            faucet.request("cosmos1hammer000000000000000000", TESTNET).await
        }));
    }

    let mut success = 0;
    for handle in handles {
        let (_, body) = handle.await.unwrap();
        if body["status"] == "success" {
            success += 1;
        }
    }

    assert_eq!(success, 1);
    assert_eq!(faucet.node.sends.load(Ordering::SeqCst), 1);
    // Cooldown rejections refund their provisional charge.
    assert_eq!(faucet.faucet.engine().usage(TESTNET).unwrap().day_tally, 100);
}
