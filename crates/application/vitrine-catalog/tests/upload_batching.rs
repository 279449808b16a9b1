use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use bytes::Bytes;
use vitrine_catalog::upload::upload_in_batches;
use vitrine_catalog::{NewImage, ObjectStore};
use vitrine_core::{EntityId, EntityKind};

/// Tracks how many uploads are in flight simultaneously.
#[derive(Default)]
struct ConcurrencyProbe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl ObjectStore for ConcurrencyProbe {
    async fn put_object(&self, key: &str, _body: Bytes, _content_type: &str) -> anyhow::Result<()> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        // Stagger completions so in-batch completion order scrambles.
        let jitter = 10 - (key.len() % 7) as u64;
        tokio::time::sleep(Duration::from_millis(jitter)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(key.to_string());
        Ok(())
    }
    async fn delete_object(&self, _key: &str) -> anyhow::Result<()> {
        Ok(())
    }
    fn public_url(&self, key: &str) -> String {
        format!("https://media.test/{key}")
    }
}

fn files(count: usize) -> Vec<NewImage> {
    (0..count)
        .map(|n| NewImage {
            file_name: format!("img-{n}.png"),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"png"),
            is_main: n == 0,
        })
        .collect()
}

#[tokio::test]
async fn peak_concurrency_is_bounded_by_the_batch_size() {
    let probe = ConcurrencyProbe::default();
    let id = EntityId::generate();

    let uploaded = upload_in_batches(&probe, EntityKind::Project, &id, 1_000, files(7), 2)
        .await
        .unwrap();

    assert_eq!(uploaded.len(), 7);
    assert!(
        probe.peak.load(Ordering::SeqCst) <= 2,
        "batch size must bound concurrent uploads"
    );
}

#[tokio::test]
async fn results_are_ordered_by_index_regardless_of_completion_order() {
    let probe = ConcurrencyProbe::default();
    let id = EntityId::generate();

    let uploaded = upload_in_batches(&probe, EntityKind::Product, &id, 42, files(6), 3)
        .await
        .unwrap();

    let indices: Vec<usize> = uploaded.iter().map(|u| u.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    for (n, item) in uploaded.iter().enumerate() {
        assert!(item.key.contains(&format!("42-{n}.")));
    }
    assert!(uploaded[0].is_main);
}

#[tokio::test]
async fn failed_upload_surfaces_as_an_error() {
    struct FailingStore;

    #[async_trait::async_trait]
    impl ObjectStore for FailingStore {
        async fn put_object(
            &self,
            _key: &str,
            _body: Bytes,
            _content_type: &str,
        ) -> anyhow::Result<()> {
            anyhow::bail!("bucket unreachable")
        }
        async fn delete_object(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
        fn public_url(&self, key: &str) -> String {
            key.to_string()
        }
    }

    let id = EntityId::generate();
    let res = upload_in_batches(&FailingStore, EntityKind::Service, &id, 1, files(2), 2).await;
    assert!(res.is_err());
}
