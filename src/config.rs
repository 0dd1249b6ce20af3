use serde::{Deserialize, Serialize};

pub mod reader;
pub mod writer;

/// One tunnel configuration: the local [`Interface`] plus the ordered
/// [`Peers`] collection. This is the unit of conversion for both the
/// INI and the JSON form.
///
/// The freshly constructed value is the zero value of both members and
/// serializes to a bare `[Interface]` header.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub interface: Interface,

    #[serde(default, skip_serializing_if = "Peers::is_empty")]
    pub peers: Peers,
}

/// The local tunnel endpoint. Field declaration order is the fixed
/// emission order for both INI lines and JSON fields.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    // PrivateKey
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub private_key: String,

    // Address
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,

    // ListenPort
    #[serde(default, skip_serializing_if = "is_zero")]
    pub listen_port: u16,

    // DNS
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,

    // Table
    #[serde(default, skip_serializing_if = "is_zero")]
    pub table: u32,

    // MTU
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mtu: u16,

    // PreUp
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pre_up: String,

    // PostUp
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_up: String,

    // PreDown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pre_down: String,

    // PostDown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub post_down: String,
}

/// One remote endpoint. `comment` is not a protocol field: it renders
/// as a `; comment` line before the `[Peer]` block, never inside it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    // leading comment line
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,

    // PublicKey
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key: String,

    // PresharedKey
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub preshared_key: String,

    // AllowedIPs
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub allowed_ips: String,

    // Endpoint
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,

    // PersistentKeepalive
    #[serde(default, skip_serializing_if = "is_zero")]
    pub persistent_keepalive: u32,
}

/// Ordered peer collection. Insertion order is significant: it is the
/// block order in INI output and the array order in JSON.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Peers(Vec<Peer>);

impl Peers {
    /// Appends a peer. Peers are never deduplicated.
    pub fn add(&mut self, peer: Peer) {
        self.0.push(peer);
    }

    pub fn find(&self, public_key: &str) -> Option<&Peer> {
        self.0.iter().find(|peer| peer.public_key == public_key)
    }

    pub fn find_mut(&mut self, public_key: &str) -> Option<&mut Peer> {
        self.0.iter_mut().find(|peer| peer.public_key == public_key)
    }

    /// Removes the first peer with the given public key, keeping the
    /// order of the remaining peers.
    pub fn remove(&mut self, public_key: &str) -> Option<Peer> {
        let idx = self.0.iter().position(|peer| peer.public_key == public_key)?;
        Some(self.0.remove(idx))
    }

    pub fn last_mut(&mut self) -> Option<&mut Peer> {
        self.0.last_mut()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Peer> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Peer>> for Peers {
    fn from(peers: Vec<Peer>) -> Self {
        Peers(peers)
    }
}

impl FromIterator<Peer> for Peers {
    fn from_iter<I: IntoIterator<Item = Peer>>(iter: I) -> Self {
        Peers(iter.into_iter().collect())
    }
}

impl IntoIterator for Peers {
    type Item = Peer;
    type IntoIter = std::vec::IntoIter<Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Peers {
    type Item = &'a Peer;
    type IntoIter = std::slice::Iter<'a, Peer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Single zero-value predicate shared by the INI writer and the serde
// annotations above, so both formats omit exactly the same fields.
pub(crate) fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
