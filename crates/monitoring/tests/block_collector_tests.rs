//! Block collector tests over a frozen chain and over a mock JSON-RPC node.

use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockito::{Matcher, Server};
use serde_json::json;
use url::Url;
use usechain_monitoring::{
    aggregate, fetch_window, BlockCollector, BlockCollectorOptions, BlockRecord, BlockSource,
    Collector, CollectorContext, CollectorRegistry, MetricSample, ScrapeDescriptors, WINDOW_SIZE,
};
use usechain_rpc_client::{RpcClient, RpcError};

/// Chain whose blocks never change. Heights in `failing` answer with an error.
struct FrozenChain {
    head: u64,
    failing: HashSet<u64>,
    calls: Mutex<Vec<String>>,
}

impl FrozenChain {
    fn new(head: u64) -> Self {
        Self {
            head,
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn timestamp(height: u64) -> i64 {
        // 10s and 20s blocks alternate
        (height as i64 / 2) * 30 + if height % 2 == 1 { 10 } else { 0 }
    }

    fn size(height: u64) -> i64 {
        500 + (height as i64 % 7) * 100
    }

    fn tx_count(height: u64) -> u64 {
        height % 5
    }

    fn check(&self, height: u64) -> Result<(), RpcError> {
        if self.failing.contains(&height) || height > self.head {
            Err(RpcError::BlockNotFound { height })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BlockSource for FrozenChain {
    async fn current_height(&self) -> Result<u64, RpcError> {
        self.calls.lock().unwrap().push("head".to_string());
        Ok(self.head)
    }

    async fn block_by_height(&self, height: u64, _include_tx: bool) -> Result<BlockRecord, RpcError> {
        self.calls.lock().unwrap().push(format!("block {height}"));
        self.check(height)?;
        Ok(BlockRecord {
            height,
            timestamp: Self::timestamp(height),
            size: Self::size(height),
            tx_count: Self::tx_count(height) as i64,
        })
    }

    async fn tx_count_by_height(&self, height: u64) -> Result<u64, RpcError> {
        self.calls.lock().unwrap().push(format!("tx {height}"));
        self.check(height)?;
        Ok(Self::tx_count(height))
    }
}

#[tokio::test]
async fn full_window_statistics() {
    let chain = FrozenChain::new(1_000);
    let fetched = fetch_window(&chain).await.unwrap();
    let stats = aggregate(&fetched);

    assert_eq!(fetched.window.start, 900);
    assert_eq!(fetched.window.slot(), WINDOW_SIZE);

    let expected_tx: i64 = (900..1_000).map(|h| FrozenChain::tx_count(h) as i64).sum();
    assert_eq!(stats.total_tx, expected_tx);
    assert_eq!(stats.total_time, 1_500);
    assert_eq!(stats.avg_delay, 15);
    assert_eq!(stats.max_delay, 20);
    assert_eq!(stats.tps, expected_tx / 1_500);
    assert_eq!(stats.max_size, 1_100);
    assert!(stats.max_size >= stats.avg_size);
    assert!(stats.max_delay >= stats.avg_delay);
}

#[tokio::test]
async fn call_sequence_is_sequential_and_ordered() {
    let chain = FrozenChain::new(2);
    fetch_window(&chain).await.unwrap();

    let calls = chain.calls.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            "head", "block 0", "block 2", "tx 0", "block 0", "block 1", "tx 1", "block 1",
            "block 2",
        ]
    );
}

#[tokio::test]
async fn young_chain_window_is_clamped() {
    let chain = FrozenChain::new(50);
    let stats = aggregate(&fetch_window(&chain).await.unwrap());

    assert_eq!(stats.height, 50);
    assert_eq!(stats.total_time, FrozenChain::timestamp(50));
    assert_eq!(stats.avg_delay, FrozenChain::timestamp(50) / 50);
}

#[tokio::test]
async fn identical_chain_gives_identical_stats() {
    let chain = FrozenChain::new(333);
    let first = aggregate(&fetch_window(&chain).await.unwrap());
    let second = aggregate(&fetch_window(&chain).await.unwrap());
    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_blocks_are_counted() {
    let mut chain = FrozenChain::new(10);
    chain.failing.insert(4);

    let options = BlockCollectorOptions {
        expose_fetch_failures: true,
        ..BlockCollectorOptions::default()
    };
    let collector = BlockCollector::new(Arc::new(chain), options).unwrap();
    let mut sink: Vec<MetricSample> = Vec::new();
    collector.update(&mut sink).await.unwrap();

    // tx 4, block 4 as `after` of 3, block 4 as `before` of 4
    let failures = sink.last().unwrap();
    assert_eq!(failures.name(), "usechain_fetchFailures");
    assert_eq!(failures.value(), 3.0);
}

#[tokio::test]
async fn scrape_through_registry() {
    let ctx = CollectorContext {
        source: Arc::new(FrozenChain::new(120)),
        block: BlockCollectorOptions::default(),
    };
    let collectors = CollectorRegistry::with_defaults()
        .build(&Default::default(), &ctx)
        .unwrap();
    let meta = ScrapeDescriptors::new("usechain").unwrap();

    let mut sink: Vec<MetricSample> = Vec::new();
    usechain_monitoring::scrape(&collectors, &meta, &mut sink).await.unwrap();

    assert_eq!(sink.len(), 11);
    assert_eq!(sink[0].name(), "usechain_height");
    assert_eq!(sink[0].value(), 120.0);
    assert_eq!(sink[10].name(), "usechain_scrape_collector_success");
    assert_eq!(sink[10].value(), 1.0);
}

fn localhost_binding_permitted() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn collects_from_json_rpc_node() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let respond = |result: serde_json::Value| json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string();

    let mut mocks = vec![
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "use_blockNumber"})))
            .with_header("content-type", "application/json")
            .with_body(respond(json!("0x2")))
            .create_async()
            .await,
    ];
    for (height, timestamp, size) in [(0u64, 1_000u64, 0u64), (1, 1_012, 640), (2, 1_030, 320)] {
        mocks.push(
            server
                .mock("POST", "/")
                .match_body(Matcher::PartialJson(json!({
                    "method": "use_getBlockByNumber",
                    "params": [format!("{:#x}", height), false]
                })))
                .with_header("content-type", "application/json")
                .with_body(respond(json!({
                    "number": format!("{:#x}", height),
                    "timestamp": format!("{:#x}", timestamp),
                    "size": format!("{:#x}", size),
                    "transactions": []
                })))
                .create_async()
                .await,
        );
    }
    for (height, count) in [(0u64, 0u64), (1, 9)] {
        mocks.push(
            server
                .mock("POST", "/")
                .match_body(Matcher::PartialJson(json!({
                    "method": "use_getBlockTransactionCountByNumber",
                    "params": [format!("{:#x}", height)]
                })))
                .with_header("content-type", "application/json")
                .with_body(respond(json!(format!("{:#x}", count))))
                .create_async()
                .await,
        );
    }

    let client = RpcClient::new(Url::parse(&server.url()).unwrap()).unwrap();
    let collector =
        BlockCollector::new(Arc::new(client), BlockCollectorOptions::default()).unwrap();
    let mut sink: Vec<MetricSample> = Vec::new();
    collector.update(&mut sink).await.unwrap();

    let values: Vec<f64> = sink.iter().map(MetricSample::value).collect();
    // height, totalTx, totalTime, tps, avgDelay, maxDelay, avgSize, maxSize, avgTxperBlock
    assert_eq!(values, vec![2.0, 9.0, 30.0, 0.0, 15.0, 18.0, 480.0, 640.0, 4.0]);
}
