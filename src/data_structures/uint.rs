//! Tagged arbitrary-precision integers for persisted wallet documents
//!
//! Balance-like values exceed the safe range of native JSON numbers, so they
//! are encoded as a tagged object `{"type": "BigNumber", "hex": "0x…"}`.
//! The tag round-trips exactly: decoding a document produced by [`Uint256`]'s
//! serializer always yields the original value, and documents written by
//! older builds keep decoding as long as they carry the same tag.

use std::fmt;

use primitive_types::U256;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker value carried in the `type` field of the tagged encoding
pub const BIG_NUMBER_TAG: &str = "BigNumber";

/// 256-bit unsigned integer with the tagged JSON encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uint256(pub U256);

impl Uint256 {
    /// The zero value
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Parse from a `0x`-prefixed hexadecimal string
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix("0x")?;
        U256::from_str_radix(digits, 16).ok().map(Self)
    }

    /// Minimal `0x`-prefixed hexadecimal rendering
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<u64> for Uint256 {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Uint256 {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Uint256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize)]
struct TaggedBigNumber {
    #[serde(rename = "type")]
    tag: String,
    hex: String,
}

impl Serialize for Uint256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedBigNumber {
            tag: BIG_NUMBER_TAG.to_string(),
            hex: self.to_hex(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Uint256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedBigNumber::deserialize(deserializer)?;
        if tagged.tag != BIG_NUMBER_TAG {
            return Err(D::Error::custom(format!(
                "expected tag '{}', found '{}'",
                BIG_NUMBER_TAG, tagged.tag
            )));
        }
        Uint256::from_hex(&tagged.hex)
            .ok_or_else(|| D::Error::custom(format!("invalid hex value '{}'", tagged.hex)))
    }
}
