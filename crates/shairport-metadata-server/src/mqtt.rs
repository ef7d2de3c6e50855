//! MQTT event source for Shairport Sync metadata.
//!
//! Shairport Sync publishes one message per metadata item on topics
//! matching `{prefix}/{item}`. [`MqttSource`] subscribes to
//! `{prefix}/#` on every (re)connect and turns incoming publishes into
//! a stream of [`RawEvent`]s for the ingestor.
//!
//! Reconnection is handled by the `rumqttc` event loop itself: after a
//! connection error the next `poll` dials the broker again. This module
//! only logs the transitions and waits `reconnect_delay` between
//! attempts so an unreachable broker does not spin the loop.

use std::time::Duration;

use futures::Stream;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use shairport_metadata_core::RawEvent;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Capacity of the client request channel.
const REQUEST_CHANNEL_CAPACITY: usize = 16;

/// Largest incoming packet accepted. Cover art easily exceeds the
/// `rumqttc` default of 10 KiB.
const MAX_INCOMING_PACKET_BYTES: usize = 16 * 1024 * 1024;

/// Largest outgoing packet. We only send connect/subscribe/ping.
const MAX_OUTGOING_PACKET_BYTES: usize = 64 * 1024;

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// MQTT client id.
    pub client_id: String,
    /// Username and password, when both are configured.
    pub credentials: Option<(String, String)>,
    /// Keep-alive interval.
    pub keep_alive: Duration,
    /// Delay before polling again after a connection error.
    pub reconnect_delay: Duration,
    /// Normalized topic prefix (no trailing slash).
    pub topic_prefix: String,
}

impl MqttSettings {
    /// Random client id short enough for MQTT 3.1 brokers (23 chars).
    pub fn generate_client_id() -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(12).collect();
        format!("shairport-{suffix}")
    }

    /// Subscription filter covering every topic under the prefix.
    pub fn topic_filter(&self) -> String {
        format!("{}/#", self.topic_prefix)
    }

    /// Build `rumqttc` options from these settings.
    pub fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options
            .set_keep_alive(self.keep_alive)
            .set_clean_session(true)
            .set_max_packet_size(MAX_INCOMING_PACKET_BYTES, MAX_OUTGOING_PACKET_BYTES);
        if let Some((user, pass)) = &self.credentials {
            options.set_credentials(user, pass);
        }
        options
    }
}

/// What one event-loop notification means to the source.
#[derive(Debug, PartialEq, Eq)]
enum BrokerEvent {
    /// An application message to hand to the ingestor.
    Message(RawEvent),
    /// The broker accepted the connection; subscriptions must be renewed.
    Connected,
    /// The broker closed the session.
    Disconnected,
    /// Acks, pings and outgoing traffic.
    Other,
}

impl From<Event> for BrokerEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::Incoming(Packet::Publish(publish)) => {
                debug!(
                    topic = %publish.topic,
                    payload_size = publish.payload.len(),
                    "received MQTT message"
                );
                Self::Message(RawEvent::new(publish.topic, publish.payload.to_vec()))
            }
            Event::Incoming(Packet::ConnAck(_)) => Self::Connected,
            Event::Incoming(Packet::Disconnect) => Self::Disconnected,
            Event::Incoming(_) | Event::Outgoing(_) => Self::Other,
        }
    }
}

/// A live MQTT connection producing Shairport events.
pub struct MqttSource {
    client: AsyncClient,
    eventloop: EventLoop,
    filter: String,
    reconnect_delay: Duration,
    connected: bool,
}

impl MqttSource {
    /// Prepare a connection. Nothing is dialed until the stream is polled.
    pub fn new(settings: &MqttSettings) -> Self {
        let (client, eventloop) = AsyncClient::new(settings.options(), REQUEST_CHANNEL_CAPACITY);
        Self {
            client,
            eventloop,
            filter: settings.topic_filter(),
            reconnect_delay: settings.reconnect_delay,
            connected: false,
        }
    }

    /// Turn the connection into an endless stream of publishes.
    ///
    /// Connection lifecycle packets are logged and consumed here; only
    /// application messages are yielded.
    pub fn into_stream(self) -> impl Stream<Item = RawEvent> + Send {
        futures::stream::unfold(self, |mut source| async move {
            let event = source.next_publish().await;
            Some((event, source))
        })
    }

    async fn next_publish(&mut self) -> RawEvent {
        loop {
            match self.eventloop.poll().await {
                Ok(event) => match BrokerEvent::from(event) {
                    BrokerEvent::Message(raw) => return raw,
                    BrokerEvent::Connected => self.on_connect().await,
                    BrokerEvent::Disconnected => {
                        self.connected = false;
                        warn!("MQTT broker requested disconnect");
                    }
                    BrokerEvent::Other => {}
                },
                Err(e) => {
                    if self.connected {
                        warn!(error = %e, "disconnected from MQTT broker");
                    } else {
                        error!(error = %e, "MQTT connection error");
                    }
                    self.connected = false;
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    async fn on_connect(&mut self) {
        self.connected = true;
        info!("connected to MQTT broker");

        match self.client.subscribe(self.filter.as_str(), QoS::AtMostOnce).await {
            Ok(()) => info!(filter = %self.filter, "subscribed"),
            Err(e) => error!(filter = %self.filter, error = %e, "failed to subscribe"),
        }
    }
}

impl std::fmt::Debug for MqttSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttSource")
            .field("filter", &self.filter)
            .field("connected", &self.connected)
            .finish_non_exhaustive()
    }
}
