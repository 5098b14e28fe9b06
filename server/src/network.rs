//! UDP notification server
//!
//! Subscribers register over UDP and receive a `Packet::Update` whenever a
//! game changes. The HTTP side queues broadcasts through the `GameMessage`
//! channel returned by [`NotificationServer::sender`]; delivery is
//! fire-and-forget.

use crate::subscribers::SubscriberManager;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Messages sent from network tasks to the main loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    SubscriberTimeout { subscriber_id: u32 },
}

/// Outgoing packets queued for the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<u32>,
    },
}

impl GameMessage {
    /// Broadcast telling every subscriber that `game_id` changed
    pub fn game_updated(game_id: &str) -> Self {
        GameMessage::BroadcastPacket {
            packet: Packet::Update {
                game_id: game_id.to_string(),
            },
            exclude: None,
        }
    }
}

pub struct NotificationServer {
    socket: Arc<UdpSocket>,
    subscribers: Arc<RwLock<SubscriberManager>>,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl NotificationServer {
    pub async fn new(
        addr: &str,
        max_subscribers: usize,
        subscriber_timeout: Duration,
    ) -> io::Result<Self> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Notification server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Self {
            socket,
            subscribers: Arc::new(RwLock::new(SubscriberManager::new(
                max_subscribers,
                subscriber_timeout,
            ))),
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Handle for queueing outgoing packets
    pub fn sender(&self) -> mpsc::UnboundedSender<GameMessage> {
        self.game_tx.clone()
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 1024];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to forward packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let subscribers = Arc::clone(&self.subscribers);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let addrs = subscribers.read().await.get_subscriber_addrs();
                        debug!("Broadcasting {:?} to {} subscribers", packet, addrs.len());

                        for (subscriber_id, addr) in addrs {
                            if Some(subscriber_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await
                            {
                                error!("Failed to send to subscriber {}: {}", subscriber_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    fn spawn_timeout_checker(&self) {
        let subscribers = Arc::clone(&self.subscribers);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = subscribers.write().await.check_timeouts();
                for subscriber_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::SubscriberTimeout { subscriber_id })
                    {
                        error!("Failed to report timeout: {}", e);
                        return;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), SendError> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Subscribe { client_version } => {
                if client_version != PROTOCOL_VERSION {
                    warn!(
                        "Rejecting subscriber at {} with protocol version {}",
                        addr, client_version
                    );
                    self.send_packet(
                        Packet::Rejected {
                            reason: format!(
                                "Unsupported protocol version {} (expected {})",
                                client_version, PROTOCOL_VERSION
                            ),
                        },
                        addr,
                    );
                    return;
                }

                let subscriber_id = {
                    let mut subscribers = self.subscribers.write().await;
                    if let Some(existing) = subscribers.find_subscriber_by_addr(addr) {
                        subscribers.remove_subscriber(&existing);
                    }
                    subscribers.add_subscriber(addr)
                };

                let response = match subscriber_id {
                    Some(subscriber_id) => Packet::Subscribed { subscriber_id },
                    None => Packet::Rejected {
                        reason: "Server full".to_string(),
                    },
                };
                self.send_packet(response, addr);
            }

            Packet::Heartbeat { timestamp } => {
                let known = {
                    let mut subscribers = self.subscribers.write().await;
                    match subscribers.find_subscriber_by_addr(addr) {
                        Some(id) => subscribers.touch(id),
                        None => false,
                    }
                };

                if known {
                    self.send_packet(Packet::Heartbeat { timestamp }, addr);
                } else {
                    debug!("Heartbeat from unknown address {}", addr);
                }
            }

            Packet::Unsubscribe => {
                let mut subscribers = self.subscribers.write().await;
                if let Some(id) = subscribers.find_subscriber_by_addr(addr) {
                    subscribers.remove_subscriber(&id);
                }
            }

            _ => {
                warn!("Unexpected packet type from {}", addr);
            }
        }
    }

    /// Runs until the process stops
    pub async fn run(&mut self) -> io::Result<()> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        info!("Notification server started");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::PacketReceived { packet, addr } => {
                    self.handle_packet(packet, addr).await;
                }
                ServerMessage::SubscriberTimeout { subscriber_id } => {
                    info!("Subscriber {} timed out", subscriber_id);
                }
            }
        }

        info!("Notification server shutting down");
        Ok(())
    }
}
