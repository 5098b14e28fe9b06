use crate::error::ClientError;
use bincode::{deserialize, serialize};
use log::{debug, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::time::{interval, timeout, Interval, MissedTickBehavior};

const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(5);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Current timestamp in milliseconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

/// Subscription to the server's game update notifications
///
/// Updates are hints only: a packet may be lost, so callers should also
/// re-fetch on their own now and then.
pub struct UpdateListener {
    socket: UdpSocket,
    server_addr: SocketAddr,
    subscriber_id: Option<u32>,
    heartbeat: Interval,
}

impl UpdateListener {
    pub async fn new(server_addr: &str) -> Result<Self, ClientError> {
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ClientError::InvalidAddress(server_addr.to_string()))?;
        let bind_addr = if server_addr.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr).await?;

        let mut heartbeat = interval(HEARTBEAT_INTERVAL);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Ok(Self {
            socket,
            server_addr,
            subscriber_id: None,
            heartbeat,
        })
    }

    pub fn subscriber_id(&self) -> Option<u32> {
        self.subscriber_id
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), ClientError> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    async fn await_subscription(&self) -> Result<u32, ClientError> {
        loop {
            match recv_packet(&self.socket, self.server_addr).await? {
                Packet::Subscribed { subscriber_id } => return Ok(subscriber_id),
                Packet::Rejected { reason } => return Err(ClientError::Rejected(reason)),
                other => debug!("Ignoring {:?} while subscribing", other),
            }
        }
    }

    /// Registers with the server and waits for the answer
    pub async fn subscribe(&mut self) -> Result<u32, ClientError> {
        self.send_packet(&Packet::Subscribe {
            client_version: PROTOCOL_VERSION,
        })
        .await?;

        let subscriber_id = timeout(SUBSCRIBE_TIMEOUT, self.await_subscription())
            .await
            .map_err(|_| ClientError::NoAnswer)??;
        info!("Subscribed to updates as {}", subscriber_id);
        self.subscriber_id = Some(subscriber_id);
        Ok(subscriber_id)
    }

    /// Waits for the next update and returns the id of the changed game
    ///
    /// Heartbeats are sent while waiting.
    pub async fn next_update(&mut self) -> Result<String, ClientError> {
        loop {
            tokio::select! {
                packet = recv_packet(&self.socket, self.server_addr) => {
                    match packet {
                        Ok(Packet::Update { game_id }) => return Ok(game_id),
                        Ok(Packet::Heartbeat { timestamp }) => {
                            debug!("Heartbeat round trip {}ms", get_timestamp().saturating_sub(timestamp));
                        }
                        Ok(Packet::Rejected { reason }) => {
                            self.subscriber_id = None;
                            return Err(ClientError::Rejected(reason));
                        }
                        Ok(other) => debug!("Ignoring {:?}", other),
                        Err(ClientError::Codec(e)) => warn!("Dropping malformed packet: {}", e),
                        Err(e) => return Err(e),
                    }
                }
                _ = self.heartbeat.tick() => {
                    self.send_packet(&Packet::Heartbeat { timestamp: get_timestamp() }).await?;
                }
            }
        }
    }

    pub async fn unsubscribe(&mut self) -> Result<(), ClientError> {
        if self.subscriber_id.take().is_some() {
            self.send_packet(&Packet::Unsubscribe).await?;
        }
        Ok(())
    }
}

async fn recv_packet(socket: &UdpSocket, server_addr: SocketAddr) -> Result<Packet, ClientError> {
    let mut buffer = [0u8; 1024];
    loop {
        let (len, addr) = socket.recv_from(&mut buffer).await?;
        if addr != server_addr {
            debug!("Ignoring packet from {}", addr);
            continue;
        }
        return Ok(deserialize::<Packet>(&buffer[..len])?);
    }
}
