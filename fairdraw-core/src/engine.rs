use crate::commitment::{CommitmentScheme, Sha256Commitment};
use crate::config::EngineConfig;
use crate::error::{DrawError, Result};
use crate::key::{Base58KeyEncoder, KeyEncoder};
use crate::range::{PrefixModuloMapper, RangeMapper};
use crate::secret::{generate_secret, OsSecretSource, SecretSource};
use crate::storage::{DrawStore, InsertOutcome};
use crate::types::{CreateDrawRequest, Draw};
use chrono::Utc;
use std::sync::Arc;

/// The pluggable pieces of a draw. `Default` wires the production set.
#[derive(Clone)]
pub struct Collaborators {
    pub secrets: Arc<dyn SecretSource>,
    pub commitment: Arc<dyn CommitmentScheme>,
    pub mapper: Arc<dyn RangeMapper>,
    pub keys: Arc<dyn KeyEncoder>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            secrets: Arc::new(OsSecretSource),
            commitment: Arc::new(Sha256Commitment),
            mapper: Arc::new(PrefixModuloMapper),
            keys: Arc::new(Base58KeyEncoder),
        }
    }
}

impl Collaborators {
    pub fn with_secrets(mut self, secrets: Arc<dyn SecretSource>) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn with_commitment(mut self, commitment: Arc<dyn CommitmentScheme>) -> Self {
        self.commitment = commitment;
        self
    }

    pub fn with_mapper(mut self, mapper: Arc<dyn RangeMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_keys(mut self, keys: Arc<dyn KeyEncoder>) -> Self {
        self.keys = keys;
        self
    }
}

/// Creates draws: secret, commitment, result, key, then a single insert.
pub struct DrawEngine {
    parts: Collaborators,
    store: Arc<dyn DrawStore>,
    config: EngineConfig,
}

impl DrawEngine {
    pub fn new(
        parts: Collaborators,
        store: Arc<dyn DrawStore>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parts,
            store,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Range checks, in reporting order.
    pub fn validate(&self, request: &CreateDrawRequest) -> Result<()> {
        let (min, max) = (request.min, request.max);

        if min >= max {
            return Err(DrawError::RangeInverted { min, max });
        }

        if min < 0 {
            return Err(DrawError::NegativeMinimum(min));
        }

        let span = max.abs_diff(min);
        if span > self.config.max_span {
            return Err(DrawError::RangeTooLarge {
                span,
                limit: self.config.max_span,
            });
        }

        Ok(())
    }

    /// Create and persist a draw. A taken key restarts the whole creation with
    /// a fresh secret, up to `max_key_attempts` times.
    pub async fn create_draw(&self, request: &CreateDrawRequest) -> Result<Draw> {
        self.validate(request)?;

        let attempts = self.config.max_key_attempts;
        for attempt in 1..=attempts {
            let draw = self.mint(request)?;

            match self.store.insert(&draw).await? {
                InsertOutcome::Inserted => {
                    tracing::info!(
                        "Created draw {} in [{}, {}] (attempt {})",
                        draw.id(),
                        draw.min(),
                        draw.max(),
                        attempt
                    );
                    return Ok(draw);
                }
                InsertOutcome::DuplicateKey => {
                    tracing::warn!(
                        "Draw key {} already taken (attempt {}/{})",
                        draw.id(),
                        attempt,
                        attempts
                    );
                }
            }
        }

        tracing::error!("Gave up allocating a draw key after {} attempts", attempts);
        Err(DrawError::KeyAllocationFailed { attempts })
    }

    fn mint(&self, request: &CreateDrawRequest) -> Result<Draw> {
        let secret = generate_secret(self.parts.secrets.as_ref())?;
        let commitment = self.parts.commitment.commit(&secret);
        let result = self
            .parts
            .mapper
            .map(&commitment, request.min, request.max)?;

        let key_bytes = self.parts.secrets.generate(self.config.key_bytes)?;
        let id = self.parts.keys.encode(&key_bytes);

        Ok(Draw::restore(
            id,
            request.owner.clone(),
            request.min,
            request.max,
            result,
            secret,
            commitment,
            Utc::now(),
        ))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::MemoryDrawStore;
    use futures::future::join_all;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;

    fn engine_with(parts: Collaborators, store: Arc<MemoryDrawStore>) -> DrawEngine {
        DrawEngine::new(parts, store, EngineConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_die_roll_is_reproducible() {
        let store = Arc::new(MemoryDrawStore::new());
        let parts = Collaborators::default().with_secrets(Arc::new(FixedSource(DIE_SECRET.to_vec())));
        let engine = engine_with(parts, store.clone());

        let draw = engine
            .create_draw(&CreateDrawRequest::new(1, 6, Some("player-1".to_string())))
            .await
            .unwrap();

        assert_eq!(draw.secret(), "00112233445566778899aabbccddeeff");
        assert_eq!(
            draw.commitment(),
            "5947d7c33d783f94b3b4c1a96ebc8991ed28f1b069b71e03376cba8caa98a720"
        );
        assert_eq!(draw.result(), 2);
        assert_eq!(draw.id(), "3sDc72FBPZZ");
        assert_eq!(draw.owner(), Some("player-1"));
        assert_eq!(store.get(draw.id()).await.unwrap(), Some(draw));
    }

    #[tokio::test]
    async fn test_validation_order() {
        let engine = engine_with(Collaborators::default(), Arc::new(MemoryDrawStore::new()));

        let cases = [
            (5, 5, ErrorKind::RangeInverted),
            (6, 1, ErrorKind::RangeInverted),
            (-10, -20, ErrorKind::RangeInverted),
            (-1, 6, ErrorKind::NegativeMinimum),
            (0, 1_000_000_001, ErrorKind::RangeTooLarge),
            (5, i64::MAX, ErrorKind::RangeTooLarge),
        ];
        for (min, max, kind) in cases {
            let err = engine
                .create_draw(&CreateDrawRequest::new(min, max, None))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), kind, "min {} max {}", min, max);
            assert!(err.is_caller_error());
        }

        engine
            .create_draw(&CreateDrawRequest::new(0, 1_000_000_000, None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_coin_flip_bounds() {
        let engine = engine_with(Collaborators::default(), Arc::new(MemoryDrawStore::new()));
        for _ in 0..50 {
            let draw = engine
                .create_draw(&CreateDrawRequest::new(0, 1, None))
                .await
                .unwrap();
            assert!(draw.result() == 0 || draw.result() == 1);
        }
    }

    #[tokio::test]
    async fn test_receipt_withholds_secret() {
        let engine = engine_with(Collaborators::default(), Arc::new(MemoryDrawStore::new()));
        let draw = engine
            .create_draw(&CreateDrawRequest::new(10, 20, None))
            .await
            .unwrap();
        let json = serde_json::to_string(&draw.receipt()).unwrap();

        assert!(!json.contains(draw.secret()));
        assert!(json.contains(draw.commitment()));
    }

    #[tokio::test]
    async fn test_secure_random_failure_aborts() {
        let store = Arc::new(MemoryDrawStore::new());
        let parts = Collaborators::default().with_secrets(Arc::new(FailingSource));
        let engine = engine_with(parts, store.clone());

        let err = engine
            .create_draw(&CreateDrawRequest::new(1, 6, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SecureRandomUnavailable);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_collision_is_retried_with_fresh_secret() {
        let store = Arc::new(MemoryDrawStore::new());
        let source = Arc::new(CountingSource::default());
        let parts = Collaborators::default()
            .with_secrets(source.clone())
            .with_keys(Arc::new(RepeatingKeys::new(2)));
        let engine = engine_with(parts, store.clone());

        let first = engine.create_draw(&CreateDrawRequest::new(1, 6, None)).await.unwrap();
        let second = engine.create_draw(&CreateDrawRequest::new(1, 6, None)).await.unwrap();

        assert_eq!(first.id(), "k0");
        assert_eq!(second.id(), "k1");
        // secret + key bytes per attempt; the second draw took two attempts
        assert_eq!(source.calls.load(Ordering::SeqCst), 6);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_key_allocation_fails_after_bounded_retries() {
        let store = Arc::new(MemoryDrawStore::new());
        let parts = Collaborators::default().with_keys(Arc::new(ConstantKey("taken")));
        let config = EngineConfig {
            max_key_attempts: 3,
            ..EngineConfig::default()
        };
        let engine = DrawEngine::new(parts, store.clone(), config).unwrap();

        engine.create_draw(&CreateDrawRequest::new(1, 6, None)).await.unwrap();
        let err = engine
            .create_draw(&CreateDrawRequest::new(1, 6, None))
            .await
            .unwrap_err();

        assert!(matches!(err, DrawError::KeyAllocationFailed { attempts: 3 }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creation_with_colliding_keys() {
        let store = Arc::new(MemoryDrawStore::new());
        let parts = Collaborators::default().with_keys(Arc::new(RepeatingKeys::new(3)));
        let engine = Arc::new(engine_with(parts, store.clone()));

        let tasks = (0..32).map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .create_draw(&CreateDrawRequest::new(0, 100 + i, None))
                    .await
            })
        });
        let results = join_all(tasks).await;

        let mut ids = HashSet::new();
        for result in results {
            match result.unwrap() {
                Ok(draw) => assert!(ids.insert(draw.id().to_string())),
                Err(e) => assert_eq!(e.kind(), ErrorKind::KeyAllocationFailed),
            }
        }
        assert_eq!(ids.len(), store.len());
        assert!(!ids.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creation_with_one_key_admits_one() {
        let store = Arc::new(MemoryDrawStore::new());
        let parts = Collaborators::default().with_keys(Arc::new(ConstantKey("only")));
        let engine = Arc::new(engine_with(parts, store.clone()));

        let tasks = (0..16).map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.create_draw(&CreateDrawRequest::new(1, 6, None)).await })
        });
        let results: Vec<_> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::KeyAllocationFailed));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            key_bytes: 0,
            ..EngineConfig::default()
        };
        let result = DrawEngine::new(
            Collaborators::default(),
            Arc::new(MemoryDrawStore::new()),
            config,
        );
        assert!(result.is_err());
    }
}
