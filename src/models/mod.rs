pub mod transaction;
pub mod worker;

pub use transaction::{BatchItemError, BatchResult, BatchTransactionRequest, FraudPrediction, Transaction};
pub use worker::{CreateWorker, ListWorkersQuery, SalaryStats, UpdateWorker, Worker, WorkerStats};
