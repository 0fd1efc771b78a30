//! Node wiring for the PACT engine.
//!
//! Builds the engine, notification fan-out, and connection directory from a
//! [`NodeConfig`], and hosts the periodic deadline sweeper with graceful
//! shutdown. Transport servers (HTTP, WebSocket) are external; they talk to
//! the node through [`PactNode::engine`] and [`PactNode::directory`].

pub mod config;
pub mod error;
pub mod node;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::PactNode;
pub use shutdown::ShutdownController;
