//! Request/response client for the game server's UDP protocol

use crate::error::ClientError;
use bincode::{deserialize, serialize};
use log::{debug, error, warn};
use shared::{Command, MoleId, Packet, PlayerName, PlayerScore, Reply, MAX_PACKET_SIZE};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;

type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;

/// Connection to a game server.
///
/// Requests may be issued concurrently from several tasks; a background
/// receiver routes each response to its request by id.
pub struct GameClient {
    socket: Arc<UdpSocket>,
    server_addr: SocketAddr,
    pending: Pending,
    next_request_id: AtomicU64,
    timeout: Duration,
    receiver: JoinHandle<()>,
}

impl GameClient {
    pub async fn connect(server_addr: &str, timeout: Duration) -> Result<Self, ClientError> {
        let server_addr: SocketAddr = server_addr.parse()?;
        let bind_addr = if server_addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = Arc::new(UdpSocket::bind(bind_addr).await?);
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let receiver = tokio::spawn(receive_responses(
            Arc::clone(&socket),
            server_addr,
            Arc::clone(&pending),
        ));

        Ok(GameClient {
            socket,
            server_addr,
            pending,
            next_request_id: AtomicU64::new(1),
            timeout,
            receiver,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub async fn register(&self, name: &PlayerName) -> Result<(), ClientError> {
        match self.request(Command::Register { name: name.clone() }).await? {
            Reply::Done => Ok(()),
            other => Err(rejection(other)),
        }
    }

    pub async fn deregister(&self, name: &PlayerName) -> Result<(), ClientError> {
        match self.request(Command::Deregister { name: name.clone() }).await? {
            Reply::Done => Ok(()),
            other => Err(rejection(other)),
        }
    }

    pub async fn players(&self) -> Result<Vec<PlayerScore>, ClientError> {
        match self.request(Command::ListPlayers).await? {
            Reply::Players(players) => Ok(players),
            other => Err(rejection(other)),
        }
    }

    pub async fn start(&self) -> Result<(), ClientError> {
        match self.request(Command::Start).await? {
            Reply::Done => Ok(()),
            other => Err(rejection(other)),
        }
    }

    pub async fn stop(&self) -> Result<(), ClientError> {
        match self.request(Command::Stop).await? {
            Reply::Done => Ok(()),
            other => Err(rejection(other)),
        }
    }

    pub async fn moles(&self) -> Result<Vec<MoleId>, ClientError> {
        match self.request(Command::ListMoles).await? {
            Reply::Moles(moles) => Ok(moles),
            other => Err(rejection(other)),
        }
    }

    /// Returns whether the whack hit; a mole that is already gone is a miss.
    pub async fn whack(&self, name: &PlayerName, mole: MoleId) -> Result<bool, ClientError> {
        let command = Command::Whack {
            name: name.clone(),
            mole,
        };
        match self.request(command).await? {
            Reply::Hit => Ok(true),
            Reply::Missed => Ok(false),
            other => Err(rejection(other)),
        }
    }

    pub async fn unread_events(&self) -> Result<Vec<String>, ClientError> {
        match self.request(Command::UnreadEvents).await? {
            Reply::Events(events) => Ok(events),
            other => Err(rejection(other)),
        }
    }

    async fn request(&self, command: Command) -> Result<Reply, ClientError> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let data = serialize(&Packet::Request {
            request_id,
            command,
        })?;

        let (reply_tx, reply_rx) = oneshot::channel();
        lock(&self.pending).insert(request_id, reply_tx);

        if let Err(e) = self.socket.send_to(&data, self.server_addr).await {
            lock(&self.pending).remove(&request_id);
            return Err(e.into());
        }

        match timeout(self.timeout, reply_rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(ClientError::Disconnected),
            Err(_) => {
                lock(&self.pending).remove(&request_id);
                Err(ClientError::Timeout(self.timeout))
            }
        }
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

fn lock(pending: &Pending) -> MutexGuard<'_, HashMap<u64, oneshot::Sender<Reply>>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Maps a failure reply onto the error a caller can act on.
fn rejection(reply: Reply) -> ClientError {
    match reply {
        Reply::Conflict { reason } => ClientError::AlreadyRegistered(reason),
        Reply::BadRequest { reason } => ClientError::NotRegistered(reason),
        Reply::ServerError { reason } => ClientError::Rejected(reason),
        other => ClientError::UnexpectedReply(format!("{:?}", other)),
    }
}

/// Routes responses from the server to whoever is waiting on them.
async fn receive_responses(socket: Arc<UdpSocket>, server_addr: SocketAddr, pending: Pending) {
    let mut buffer = vec![0u8; MAX_PACKET_SIZE];

    loop {
        let (len, addr) = match socket.recv_from(&mut buffer).await {
            Ok(received) => received,
            Err(e) => {
                error!("Error receiving packet: {}", e);
                tokio::time::sleep(Duration::from_millis(10)).await;
                continue;
            }
        };

        if addr != server_addr {
            warn!("Ignoring packet from unknown sender {}", addr);
            continue;
        }

        match deserialize::<Packet>(&buffer[..len]) {
            Ok(Packet::Response { request_id, reply }) => {
                match lock(&pending).remove(&request_id) {
                    Some(waiter) => {
                        let _ = waiter.send(reply);
                    }
                    None => debug!("Dropping late response {}", request_id),
                }
            }
            Ok(_) => warn!("Unexpected packet type from server"),
            Err(e) => warn!("Failed to deserialize packet from server: {}", e),
        }
    }
}
