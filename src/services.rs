pub mod ai_client;
pub mod auth;
pub mod export;
pub mod fields;
pub mod generation;
pub mod health;
pub mod prompts;
pub mod stripe;
pub mod subscription;

pub use auth::AuthService;
pub use export::ExportService;
pub use generation::GenerationService;
pub use health::HealthService;
pub use stripe::StripeWebhookService;
pub use subscription::SubscriptionService;
