pub mod store;
pub use store::{BillingStore, DocumentStore, UserStore};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod billing_repo;
pub use billing_repo::BillingRepository;
