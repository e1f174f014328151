//! Module containing functionality related to BSON ObjectIds.
//! For more information, see the documentation for the [`ObjectId`] type.

use std::{
    fmt,
    str::FromStr,
    sync::{
        LazyLock,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use rand::{Rng, random, rng};

use crate::{
    DateTime,
    error::{Error, Result},
};

const TIMESTAMP_SIZE: usize = 4;
const PROCESS_ID_SIZE: usize = 5;
const COUNTER_SIZE: usize = 3;

const TIMESTAMP_OFFSET: usize = 0;
const PROCESS_ID_OFFSET: usize = TIMESTAMP_OFFSET + TIMESTAMP_SIZE;
const COUNTER_OFFSET: usize = PROCESS_ID_OFFSET + PROCESS_ID_SIZE;

const MAX_U24: usize = 0xFF_FFFF;

static OID_COUNTER: LazyLock<AtomicUsize> = LazyLock::new(|| {
    let seed = rng().random_range(0..=MAX_U24);
    tracing::trace!(seed, "seeded ObjectId counter");
    AtomicUsize::new(seed)
});

static PROCESS_UNIQUE: LazyLock<[u8; PROCESS_ID_SIZE]> = LazyLock::new(|| {
    let process_unique: [u8; PROCESS_ID_SIZE] = random();
    tracing::trace!(
        process_unique = %hex::encode(process_unique),
        "generated ObjectId process identifier"
    );
    process_unique
});

/// A wrapper around a raw 12-byte ObjectId.
///
/// The layout is a 4-byte big-endian count of seconds since the Unix epoch, a 5-byte value
/// generated once per process, and a 3-byte big-endian counter that starts at a random value and
/// is incremented atomically for every id this process generates.
///
/// ```rust
/// use bson_core::oid::ObjectId;
///
/// let oid = ObjectId::new();
/// let parsed = ObjectId::parse_str(oid.to_hex()).unwrap();
/// assert_eq!(oid, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct ObjectId {
    id: [u8; 12],
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl From<[u8; 12]> for ObjectId {
    fn from(bytes: [u8; 12]) -> Self {
        Self { id: bytes }
    }
}

impl TryFrom<&[u8]> for ObjectId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let id: [u8; 12] = bytes
            .try_into()
            .map_err(|_| Error::oid_invalid_byte_length(bytes.len()))?;
        Ok(Self::from_bytes(id))
    }
}

impl ObjectId {
    /// Generates a new [`ObjectId`].
    ///
    /// See the [docs](http://www.mongodb.com/docs/manual/reference/object-id/)
    /// for more information.
    pub fn new() -> ObjectId {
        Self::from_parts(Self::gen_timestamp(), *PROCESS_UNIQUE, Self::gen_count())
    }

    /// Constructs a new ObjectId wrapper around the raw byte representation.
    pub const fn from_bytes(bytes: [u8; 12]) -> ObjectId {
        ObjectId { id: bytes }
    }

    /// Assembles an [`ObjectId`] from a timestamp in seconds, a 5-byte process value and a
    /// counter. Only the low 24 bits of `counter` are used.
    pub fn from_parts(seconds: u32, process_id: [u8; 5], counter: u32) -> ObjectId {
        let mut id = [0u8; 12];
        id[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET].copy_from_slice(&seconds.to_be_bytes());
        id[PROCESS_ID_OFFSET..COUNTER_OFFSET].copy_from_slice(&process_id);
        id[COUNTER_OFFSET..].copy_from_slice(&counter.to_be_bytes()[4 - COUNTER_SIZE..]);
        Self::from_bytes(id)
    }

    /// Creates an ObjectID using a 12-byte (24-char) hexadecimal string.
    pub fn parse_str(s: impl AsRef<str>) -> Result<ObjectId> {
        let s = s.as_ref();

        let bytes: Vec<u8> =
            hex::decode(s.as_bytes()).map_err(|e| Error::from_hex_error(e, s.len()))?;
        let id: [u8; 12] = bytes
            .try_into()
            .map_err(|_| Error::oid_invalid_length(s.len()))?;
        Ok(Self::from_bytes(id))
    }

    /// Retrieves the timestamp from an [`ObjectId`].
    pub fn timestamp(&self) -> DateTime {
        DateTime::from_millis(i64::from(self.seconds()) * 1000)
    }

    /// The seconds-since-epoch portion of this id.
    pub fn seconds(&self) -> u32 {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.id[TIMESTAMP_OFFSET..PROCESS_ID_OFFSET]);
        u32::from_be_bytes(buf)
    }

    /// The 5-byte process-unique portion of this id.
    pub fn process_id(&self) -> [u8; 5] {
        let mut buf = [0u8; PROCESS_ID_SIZE];
        buf.copy_from_slice(&self.id[PROCESS_ID_OFFSET..COUNTER_OFFSET]);
        buf
    }

    /// The 24-bit counter portion of this id.
    pub fn counter(&self) -> u32 {
        let mut buf = [0u8; 4];
        buf[1..].copy_from_slice(&self.id[COUNTER_OFFSET..]);
        u32::from_be_bytes(buf)
    }

    /// Returns the raw byte representation of an ObjectId.
    pub const fn bytes(&self) -> [u8; 12] {
        self.id
    }

    /// Convert this [`ObjectId`] to its lowercase hex string representation.
    pub fn to_hex(self) -> String {
        hex::encode(self.id)
    }

    fn gen_timestamp() -> u32 {
        let seconds = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        // Truncation is part of the format: the field wraps in 2106.
        seconds as u32
    }

    fn gen_count() -> u32 {
        let u_counter = OID_COUNTER.fetch_add(1, Ordering::SeqCst);

        // Mod the result rather than the counter itself so concurrent callers never race on a
        // store.
        (u_counter % (MAX_U24 + 1)) as u32
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}
