//! Audit events for state changes.
//!
//! Every successful mutating operation appends exactly one event; failed
//! operations append nothing. Events carry a monotonically increasing
//! sequence number and are chained into a running SHA256 digest so that an
//! auditor can detect a rewritten history even after old entries are pruned.

use serde::{Deserialize, Serialize};

use crate::core::amount::Amount;
use crate::core::asset::AssetId;
use crate::utils::address::Address;
use crate::utils::constants::MAX_EVENTS;
use crate::utils::crypto::Hash;

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT TYPES
// ═══════════════════════════════════════════════════════════════════════════════

/// All audit event types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondingEvent {
    /// Service reference was rewritten
    ServiceAddressChanged(ServiceAddressChangedEvent),
    /// Asset was added to the protected set
    ProtectedAssetAdded(ProtectedAssetEvent),
    /// Asset was removed from the protected set
    ProtectedAssetRemoved(ProtectedAssetEvent),
    /// Dust left the holding account
    DustSent(DustSentEvent),
    /// Administration changed hands
    AdministratorTransferred(AdministratorTransferredEvent),
}

impl BondingEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceAddressChanged(_) => "ServiceAddressChanged",
            Self::ProtectedAssetAdded(_) => "ProtectedAssetAdded",
            Self::ProtectedAssetRemoved(_) => "ProtectedAssetRemoved",
            Self::DustSent(_) => "DustSent",
            Self::AdministratorTransferred(_) => "AdministratorTransferred",
        }
    }

    /// Sequence number assigned when the event was recorded
    pub fn sequence(&self) -> u64 {
        match self {
            Self::ServiceAddressChanged(e) => e.sequence,
            Self::ProtectedAssetAdded(e) | Self::ProtectedAssetRemoved(e) => e.sequence,
            Self::DustSent(e) => e.sequence,
            Self::AdministratorTransferred(e) => e.sequence,
        }
    }

    /// Unix timestamp (seconds)
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::ServiceAddressChanged(e) => e.timestamp,
            Self::ProtectedAssetAdded(e) | Self::ProtectedAssetRemoved(e) => e.timestamp,
            Self::DustSent(e) => e.timestamp,
            Self::AdministratorTransferred(e) => e.timestamp,
        }
    }

    /// Compute event hash
    pub fn hash(&self) -> Hash {
        let data = bincode::serialize(self).unwrap_or_default();
        Hash::sha256(&data)
    }
}

/// Emitted when the service reference is rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAddressChangedEvent {
    /// Value before the call
    pub previous: Address,
    /// Value after the call
    pub current: Address,
    /// Sequence number
    pub sequence: u64,
    /// Timestamp
    pub timestamp: u64,
}

/// Emitted when protected set membership changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedAssetEvent {
    /// Asset whose membership changed
    pub asset: AssetId,
    /// Sequence number
    pub sequence: u64,
    /// Timestamp
    pub timestamp: u64,
}

/// Emitted after a successful sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DustSentEvent {
    /// Asset moved
    pub asset: AssetId,
    /// Recipient
    pub destination: Address,
    /// Amount moved
    pub amount: Amount,
    /// Sequence number
    pub sequence: u64,
    /// Timestamp
    pub timestamp: u64,
}

/// Emitted when the administrator changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorTransferredEvent {
    /// Outgoing administrator
    pub previous: Address,
    /// Incoming administrator
    pub current: Address,
    /// Sequence number
    pub sequence: u64,
    /// Timestamp
    pub timestamp: u64,
}

/// Current unix time in seconds
pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVENT LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// Bounded, hash-chained audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<BondingEvent>,
    max_events: usize,
    next_sequence: u64,
    /// Running digest over every event ever recorded, pruned ones included
    head: Hash,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }

    /// Create a log retaining at most `max_events` entries
    pub fn with_capacity(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events: max_events.max(1),
            next_sequence: 0,
            head: Hash::zero(),
        }
    }

    /// Sequence number the next event must carry
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Append an event (with pruning)
    pub(crate) fn push(&mut self, event: BondingEvent) {
        debug_assert_eq!(event.sequence(), self.next_sequence);
        self.head = self.head.chain(&event.hash());
        self.next_sequence = event.sequence() + 1;
        self.events.push(event);

        if self.events.len() > self.max_events {
            self.events.drain(0..self.events.len() - self.max_events);
        }
    }

    /// Retained events, oldest first
    pub fn events(&self) -> &[BondingEvent] {
        &self.events
    }

    /// Most recent event
    pub fn latest(&self) -> Option<&BondingEvent> {
        self.events.last()
    }

    /// Retained events with `sequence >= from`
    pub fn since(&self, from: u64) -> &[BondingEvent] {
        let start = self.events.partition_point(|e| e.sequence() < from);
        &self.events[start..]
    }

    /// Get events of a specific type
    pub fn filter_by_type(&self, event_type: &str) -> Vec<&BondingEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Running digest of the whole history
    pub fn head(&self) -> Hash {
        self.head
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
