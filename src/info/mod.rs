pub mod info_client;

pub use info_client::InfoClient;
