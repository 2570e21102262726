//! Node identity: the (worker id, data center id) pair stamped into every id
//!
//! Explicit ids are range-checked. When none are supplied, a default pair is
//! derived from the host's network hardware address. Two hosts can derive the
//! same pair; avoiding that is left to whoever deploys them.

use once_cell::sync::{Lazy, OnceCell};
use pnet::datalink;
use tracing::debug;

use crate::error::{Result, SnowflakeError};
use crate::layout::{MAX_DATA_CENTER_ID, MAX_WORKER_ID};

const NODE_ID_SPACE: u32 = MAX_WORKER_ID as u32 + 1;

static SYSTEM_IDENTITY: Lazy<NodeIdentity> = Lazy::new(|| NodeIdentity::new(InterfaceMacSource));

/// Validated (worker id, data center id) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    worker_id: u8,
    data_center_id: u8,
}

impl NodeId {
    /// Range-check explicit ids against their 5-bit fields
    pub fn new(worker_id: u32, data_center_id: u32) -> Result<Self> {
        if worker_id > MAX_WORKER_ID as u32 {
            return Err(SnowflakeError::InvalidWorkerId {
                worker_id,
                max: MAX_WORKER_ID,
            });
        }
        if data_center_id > MAX_DATA_CENTER_ID as u32 {
            return Err(SnowflakeError::InvalidDataCenterId {
                data_center_id,
                max: MAX_DATA_CENTER_ID,
            });
        }
        Ok(Self {
            worker_id: worker_id as u8,
            data_center_id: data_center_id as u8,
        })
    }

    /// Derive a default pair from a hardware address.
    ///
    /// The worker id is the byte sum modulo 32. The data center id comes from
    /// the top bits of the last two bytes, modulo 32.
    pub fn from_hardware_address(mac: &[u8; 6]) -> Self {
        let byte_sum: u32 = mac.iter().map(|&b| u32::from(b)).sum();
        let tail = u32::from(mac[4]) | (u32::from(mac[5]) << 8);
        Self {
            worker_id: (byte_sum % NODE_ID_SPACE) as u8,
            data_center_id: ((tail >> 6) % NODE_ID_SPACE) as u8,
        }
    }

    #[inline(always)]
    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }

    #[inline(always)]
    pub const fn data_center_id(&self) -> u8 {
        self.data_center_id
    }
}

/// Provider of the host's primary hardware address
pub trait MacAddressSource: Send + Sync {
    fn hardware_address(&self) -> Option<[u8; 6]>;
}

/// Reads the first non-loopback interface with a non-zero MAC address.
/// Interfaces are taken in the order the OS reports them.
#[derive(Debug, Default, Clone, Copy)]
pub struct InterfaceMacSource;

impl MacAddressSource for InterfaceMacSource {
    fn hardware_address(&self) -> Option<[u8; 6]> {
        datalink::interfaces()
            .into_iter()
            .filter(|iface| !iface.is_loopback())
            .filter_map(|iface| iface.mac)
            .map(|mac| mac.octets())
            .find(|octets| octets.iter().any(|&b| b != 0))
    }
}

/// Resolves the default node id once and caches the outcome
pub struct NodeIdentity<S = InterfaceMacSource> {
    source: S,
    resolved: OnceCell<NodeId>,
}

impl NodeIdentity<InterfaceMacSource> {
    /// Process-wide identity backed by the host's network interfaces
    pub fn system() -> &'static NodeIdentity {
        &SYSTEM_IDENTITY
    }
}

impl<S: MacAddressSource> NodeIdentity<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            resolved: OnceCell::new(),
        }
    }

    /// Default node id for this host. Failure is not cached, so a host whose
    /// interfaces come up later can still resolve.
    pub fn resolve(&self) -> Result<NodeId> {
        self.resolved
            .get_or_try_init(|| {
                let mac = self.source.hardware_address().ok_or_else(|| {
                    SnowflakeError::NodeIdentityUnavailable {
                        reason: "no non-loopback interface with a hardware address".to_string(),
                    }
                })?;
                let node = NodeId::from_hardware_address(&mac);
                debug!(
                    worker_id = node.worker_id(),
                    data_center_id = node.data_center_id(),
                    "resolved node identity from hardware address"
                );
                Ok(node)
            })
            .copied()
    }
}

impl<S> std::fmt::Debug for NodeIdentity<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIdentity")
            .field("resolved", &self.resolved.get())
            .finish_non_exhaustive()
    }
}
