//! fairdraw - provably fair random draws
//!
//! A draw commits to a random secret by publishing its SHA-256 hash, folds
//! that hash into the requested range, and stores everything under a short
//! base-58 key. Anyone holding the key can later fetch the secret and redo
//! every step of the derivation.

pub mod audit;
pub mod commitment;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod range;
pub mod secret;
pub mod service;
pub mod storage;
pub mod types;
pub mod verifier;

pub use commitment::{CommitmentScheme, Sha256Commitment};
pub use config::EngineConfig;
pub use engine::{Collaborators, DrawEngine};
pub use error::{DrawError, ErrorKind, Result};
pub use key::{Base58KeyEncoder, KeyEncoder};
pub use range::{PrefixModuloMapper, RangeDerivation, RangeMapper};
pub use secret::{OsSecretSource, SecretSource};
pub use service::DrawService;
pub use storage::{DrawHistory, DrawStore, InsertOutcome, MemoryDrawStore, SqliteDrawStore};
pub use types::{
    CreateDrawRequest, Draw, DrawPage, DrawReceipt, HistoryEntry, TraceStep, VerificationReport,
    VerifyRequest,
};
pub use verifier::Verifier;
