//! Client modules for the Discord HTTP API

pub mod discord_client;
pub mod transport;

pub use discord_client::{DiscordClient, ExecuteOptions};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
