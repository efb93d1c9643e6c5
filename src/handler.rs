//! TCP connection handler
//!
//! Handles one client connection: line-based reading, command parsing,
//! and bidirectional bridging with the ChatServer actor.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::server::ServerCommand;

/// Buffer size for the per-client outbound channel
const OUTBOUND_BUFFER_SIZE: usize = 32;

/// Handle a new TCP connection
///
/// Registers the client with the ChatServer, then pumps lines from the
/// socket into server commands and server replies back onto the socket
/// until either direction closes.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let addr = stream.peer_addr()?.to_string();
    debug!("New TCP connection from {}", addr);

    let (read_half, mut write_half) = stream.into_split();

    // Create channel for server -> client lines
    let (msg_tx, mut msg_rx) = mpsc::channel::<String>(OUTBOUND_BUFFER_SIZE);

    // Register with ChatServer
    if cmd_tx
        .send(ServerCommand::Connect {
            addr: addr.clone(),
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", addr);
        return Err(AppError::ChannelSend);
    }

    // Spawn read task (socket lines -> ServerCommand)
    let cmd_tx_read = cmd_tx.clone();
    let read_addr = addr.clone();
    let read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let (command, context) = split_command(&line);
                    let cmd = ServerCommand::Input {
                        addr: read_addr.clone(),
                        command,
                        context,
                    };
                    if cmd_tx_read.send(cmd).await.is_err() {
                        debug!("Server closed, ending read task for {}", read_addr);
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Client {} closed the connection", read_addr);
                    break;
                }
                Err(e) => {
                    error!("Read error for {}: {}", read_addr, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", read_addr);
    });

    // Spawn write task (server lines -> socket)
    let write_task = tokio::spawn(async move {
        while let Some(line) = msg_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err()
                || write_half.write_all(b"\n").await.is_err()
            {
                debug!("Socket write failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for client");

        let _ = write_half.shutdown().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", addr);
        }
        _ = write_task => {
            debug!("Write task completed for {}", addr);
        }
    }

    // Send disconnect command
    let _ = cmd_tx
        .send(ServerCommand::Disconnect { addr: addr.clone() })
        .await;

    info!("Client {} disconnected", addr);

    Ok(())
}

/// Split one input line into its command word and verbatim context.
///
/// The first space separates the command from the context; everything after
/// it is preserved as-is, further spaces included. Trailing `\r` from
/// CRLF-terminated clients is stripped first.
fn split_command(line: &str) -> (String, String) {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line.split_once(' ') {
        Some((command, context)) => (command.to_string(), context.to_string()),
        None => (line.to_string(), String::new()),
    }
}
