//! Multi-user TCP Chat Server Library
//!
//! A learning-oriented line-protocol chat server built with tokio
//! using the Actor pattern for state management.
//!
//! # Features
//! - Newline-delimited text protocol over plain TCP
//! - `who` online listing with self-marking
//! - `bc` broadcast to everyone else online
//! - `rename` with duplicate-name protection
//! - `to` direct messages
//! - Disconnection handling
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning the user registry
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use linechat::{ChatServer, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod command;
pub mod error;
pub mod handler;
pub mod registry;
pub mod server;
pub mod user;

// Re-export main types for convenience
pub use command::{CommandTable, Handler};
pub use error::{AppError, SendError};
pub use handler::handle_connection;
pub use registry::{Registry, RenameOutcome};
pub use server::{ChatServer, ServerCommand};
pub use user::User;
