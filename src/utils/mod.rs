pub mod mime;
pub mod webhook_url;

pub use webhook_url::parse_webhook_url;
