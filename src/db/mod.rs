pub mod errors;
pub mod keys;
pub mod storage;
pub mod transaction;

pub use errors::{ConstraintViolation, StorageError, StorageResult};
pub use storage::LedgerStorage;
pub use transaction::LedgerTx;
