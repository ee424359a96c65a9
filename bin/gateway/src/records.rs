//! Static records loaded from a JSON file.
//!
//! ```json
//! {
//!   "test.eth": {
//!     "addr": { "60": "0x51050ec063d393217b436747617ad1c2285aeeee" },
//!     "text": { "name": "Test" },
//!     "contenthash": "0xe301017012201687de19f1516b9e560ab8655faa678e3a023eb",
//!     "pubkey": { "x": "0x1", "y": "0x2" },
//!     "name": "test.eth",
//!     "abi": { "type": 1, "data": "0x5b5d" }
//!   }
//! }
//! ```
//!
//! Coin types are decimal, `0x` hex or `evm:<chain id>`. The record named `*` answers every name
//! without a record of its own.

use crate::constants::WILDCARD_RESOLVER;
use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use ezccip::{BoxError, CallContext, Pubkey, Record, RecordAbi, RecordSource};
use ezccip_primitives::EVM_COIN_TYPE_MSB;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    str::FromStr,
    sync::Arc,
};

/// An error that can occur while loading records.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// The records file could not be read.
    #[error("failed to read records: {0}")]
    Io(#[from] std::io::Error),
    /// The records file is not valid.
    #[error("invalid records: {0}")]
    Json(#[from] serde_json::Error),
}

/// A point answered by `pubkey(node)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StaticPubkey {
    /// The x coordinate.
    pub x: U256,
    /// The y coordinate.
    pub y: U256,
}

/// An abi answered by `ABI(node, contentTypes)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaticAbi {
    /// The content type bit of `data`.
    #[serde(rename = "type")]
    pub content_type: u64,
    /// The encoded abi.
    pub data: Bytes,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStaticRecord {
    #[serde(default)]
    addr: BTreeMap<String, Bytes>,
    #[serde(default)]
    text: BTreeMap<String, String>,
    contenthash: Option<Bytes>,
    pubkey: Option<StaticPubkey>,
    name: Option<String>,
    abi: Option<StaticAbi>,
}

/// The record of a single name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawStaticRecord")]
pub struct StaticRecord {
    /// Addresses by coin type.
    pub addr: BTreeMap<U256, Bytes>,
    /// Text records by key.
    pub text: BTreeMap<String, String>,
    /// The content hash.
    pub contenthash: Option<Bytes>,
    /// The public key.
    pub pubkey: Option<StaticPubkey>,
    /// The reverse name.
    pub name: Option<String>,
    /// The contract abi.
    pub abi: Option<StaticAbi>,
}

impl TryFrom<RawStaticRecord> for StaticRecord {
    type Error = String;

    fn try_from(raw: RawStaticRecord) -> Result<Self, Self::Error> {
        let addr = raw
            .addr
            .into_iter()
            .map(|(coin_type, value)| {
                parse_coin_type(&coin_type)
                    .map(|coin_type| (coin_type, value))
                    .ok_or_else(|| format!("invalid coin type: {coin_type}"))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self {
            addr,
            text: raw.text,
            contenthash: raw.contenthash,
            pubkey: raw.pubkey,
            name: raw.name,
            abi: raw.abi,
        })
    }
}

/// Parses a decimal, `0x` hex or `evm:<chain id>` coin type.
fn parse_coin_type(s: &str) -> Option<U256> {
    match s.strip_prefix("evm:") {
        Some(chain) => {
            let chain = u64::from_str(chain).ok()?;
            chain.checked_add(EVM_COIN_TYPE_MSB).map(U256::from)
        }
        None => U256::from_str(s).ok(),
    }
}

#[async_trait]
impl Record for StaticRecord {
    async fn addr(&self, coin_type: U256) -> Result<Option<Bytes>, BoxError> {
        Ok(self.addr.get(&coin_type).cloned())
    }

    async fn text(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok(self.text.get(key).cloned())
    }

    async fn contenthash(&self) -> Result<Option<Bytes>, BoxError> {
        Ok(self.contenthash.clone())
    }

    async fn pubkey(&self) -> Result<Option<Pubkey>, BoxError> {
        Ok(self.pubkey.map(|StaticPubkey { x, y }| Pubkey::Coordinates { x, y }))
    }

    async fn name(&self) -> Result<Option<String>, BoxError> {
        Ok(self.name.clone())
    }

    async fn abi(&self, content_types: U256) -> Result<Option<RecordAbi>, BoxError> {
        let Some(abi) = &self.abi else { return Ok(None) };
        let content_type = U256::from(abi.content_type);
        if content_types & content_type == U256::ZERO {
            return Ok(None);
        }
        Ok(Some(RecordAbi::Typed { content_type, data: abi.data.clone() }))
    }
}

/// Records keyed by name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticRecords(HashMap<String, Arc<StaticRecord>>);

impl StaticRecords {
    /// Parses records from JSON.
    pub fn from_json(json: &str) -> Result<Self, RecordsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads records from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RecordsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Returns the record of `name`, or the wildcard record.
    pub fn get(&self, name: &str) -> Option<&Arc<StaticRecord>> {
        self.0.get(name).or_else(|| self.0.get(WILDCARD_RESOLVER))
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[async_trait]
impl RecordSource for StaticRecords {
    async fn record(
        &self,
        name: &str,
        _context: &CallContext,
    ) -> Result<Option<Arc<dyn Record>>, BoxError> {
        Ok(self.get(name).map(|record| record.clone() as Arc<dyn Record>))
    }
}
