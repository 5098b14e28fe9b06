//! Registry of UDP endpoints listening for game update notifications
//!
//! Subscribers are identified by a server-assigned id and the address their
//! packets come from. The registry enforces a capacity limit and forgets
//! subscribers that stop sending heartbeats.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Subscriber {
    pub id: u32,
    pub addr: SocketAddr,
    /// Last time any packet arrived from this subscriber
    pub last_seen: Instant,
}

impl Subscriber {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Capacity-limited set of subscribers
pub struct SubscriberManager {
    subscribers: HashMap<u32, Subscriber>,
    next_subscriber_id: u32,
    max_subscribers: usize,
    timeout: Duration,
}

impl SubscriberManager {
    pub fn new(max_subscribers: usize, timeout: Duration) -> Self {
        Self {
            subscribers: HashMap::new(),
            next_subscriber_id: 1,
            max_subscribers,
            timeout,
        }
    }

    /// Registers `addr`, returning its id, or None when full
    pub fn add_subscriber(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.subscribers.len() >= self.max_subscribers {
            return None;
        }

        let id = self.next_subscriber_id;
        self.next_subscriber_id += 1;

        info!("Subscriber {} registered from {}", id, addr);
        self.subscribers.insert(id, Subscriber::new(id, addr));
        Some(id)
    }

    pub fn remove_subscriber(&mut self, id: &u32) -> bool {
        if let Some(subscriber) = self.subscribers.remove(id) {
            info!("Subscriber {} removed", subscriber.id);
            true
        } else {
            false
        }
    }

    pub fn find_subscriber_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.subscribers
            .iter()
            .find(|(_, subscriber)| subscriber.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Marks the subscriber as alive; false if the id is unknown
    pub fn touch(&mut self, id: u32) -> bool {
        match self.subscribers.get_mut(&id) {
            Some(subscriber) => {
                subscriber.touch();
                true
            }
            None => false,
        }
    }

    /// Drops every subscriber silent for longer than the timeout
    ///
    /// Returns the removed ids.
    pub fn check_timeouts(&mut self) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .subscribers
            .iter()
            .filter(|(_, subscriber)| subscriber.is_timed_out(self.timeout))
            .map(|(id, _)| *id)
            .collect();

        for id in &timed_out {
            self.remove_subscriber(id);
        }

        timed_out
    }

    pub fn get_subscriber_addrs(&self) -> Vec<(u32, SocketAddr)> {
        self.subscribers
            .iter()
            .map(|(id, subscriber)| (*id, subscriber.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
