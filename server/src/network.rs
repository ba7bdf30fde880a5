//! Server network layer answering game commands over UDP

use crate::error::GameError;
use crate::service::GameService;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Command, Packet, Reply, MAX_LISTED_MOLES, MAX_PACKET_SIZE};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

/// UDP front end for a [`GameService`].
///
/// Each request datagram is handled on its own task, so commands from
/// different clients reach the engine concurrently.
pub struct Server {
    socket: Arc<UdpSocket>,
    service: Arc<GameService>,
}

impl Server {
    pub async fn bind(
        addr: &str,
        service: Arc<GameService>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        Ok(Server { socket, service })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Receives and answers requests until the surrounding task is dropped.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut buffer = vec![0u8; MAX_PACKET_SIZE];

        loop {
            let (len, addr) = match self.socket.recv_from(&mut buffer).await {
                Ok(received) => received,
                Err(e) => {
                    error!("Error receiving packet: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            let (request_id, command) = match deserialize::<Packet>(&buffer[..len]) {
                Ok(Packet::Request {
                    request_id,
                    command,
                }) => (request_id, command),
                Ok(_) => {
                    warn!("Unexpected packet type from {}", addr);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to deserialize packet from {}: {}", addr, e);
                    continue;
                }
            };

            let socket = Arc::clone(&self.socket);
            let service = Arc::clone(&self.service);
            tokio::spawn(async move {
                debug!("Request {} from {}: {:?}", request_id, addr, command);
                let reply = dispatch(&service, command).await;

                if let Err(e) = send_response(&socket, request_id, reply, addr).await {
                    error!("Failed to send response to {}: {}", addr, e);
                }
            });
        }
    }
}

async fn send_response(
    socket: &UdpSocket,
    request_id: u64,
    reply: Reply,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let data = encode_response(request_id, reply)?;
    socket.send_to(&data, addr).await?;
    Ok(())
}

/// Encodes a response, swapping in a `ServerError` when the reply would not
/// fit in one datagram so the request is still answered.
fn encode_response(request_id: u64, reply: Reply) -> Result<Vec<u8>, bincode::Error> {
    let data = serialize(&Packet::Response { request_id, reply })?;
    if data.len() <= MAX_PACKET_SIZE {
        return Ok(data);
    }

    warn!(
        "Response {} is {} bytes, over the {} byte datagram limit",
        request_id,
        data.len(),
        MAX_PACKET_SIZE
    );
    let reason = format!(
        "Response of {} bytes exceeds the {} byte datagram limit",
        data.len(),
        MAX_PACKET_SIZE
    );
    serialize(&Packet::Response {
        request_id,
        reply: Reply::ServerError { reason },
    })
}

/// Runs a command against the service and turns the outcome into a reply.
pub async fn dispatch(service: &GameService, command: Command) -> Reply {
    match command {
        Command::Register { name } => into_reply(service.register(name).await),
        Command::Deregister { name } => into_reply(service.remove(&name).await),
        Command::ListPlayers => Reply::Players(service.players().await),
        Command::Start => {
            service.start().await;
            Reply::Done
        }
        Command::Stop => {
            service.stop().await;
            Reply::Done
        }
        Command::ListMoles => {
            let mut moles = service.moles().await;
            if moles.len() > MAX_LISTED_MOLES {
                warn!("Listing {} of {} moles", MAX_LISTED_MOLES, moles.len());
                moles.truncate(MAX_LISTED_MOLES);
            }
            Reply::Moles(moles)
        }
        Command::Whack { name, mole } => match service.whack(mole, &name).await {
            Ok(true) => Reply::Hit,
            Ok(false) => Reply::Missed,
            Err(e) => error_reply(e),
        },
        Command::UnreadEvents => Reply::Events(service.unread_events()),
    }
}

fn into_reply(result: Result<(), GameError>) -> Reply {
    match result {
        Ok(()) => Reply::Done,
        Err(e) => error_reply(e),
    }
}

fn error_reply(error: GameError) -> Reply {
    let reason = error.to_string();
    match error {
        GameError::AlreadyRegistered(_) => Reply::Conflict { reason },
        GameError::NotRegistered(_) => Reply::BadRequest { reason },
    }
}
