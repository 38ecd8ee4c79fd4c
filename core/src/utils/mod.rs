mod stream;
pub use stream::*;

pub mod serde_hex;

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Serialize {
    fn serialize(&self, writer: &mut dyn BufferWriter);

    fn to_vec(&self) -> Vec<u8> {
        let mut stream = MemoryStream::new();
        self.serialize(&mut stream);
        stream.to_vec()
    }
}

pub trait FixedSizeSerialize: Serialize {
    fn serialized_size() -> usize;
}

pub trait Deserialize {
    type Target;
    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<Self::Target>;

    fn deserialize_bytes(bytes: &[u8]) -> anyhow::Result<Self::Target> {
        let mut reader = BufferReader::new(bytes);
        Self::deserialize(&mut reader)
    }
}

impl Serialize for u64 {
    fn serialize(&self, writer: &mut dyn BufferWriter) {
        writer.write_u64_be_safe(*self);
    }
}

impl FixedSizeSerialize for u64 {
    fn serialized_size() -> usize {
        std::mem::size_of::<u64>()
    }
}

impl Deserialize for u64 {
    type Target = Self;
    fn deserialize(stream: &mut dyn Stream) -> anyhow::Result<u64> {
        stream.read_u64_be()
    }
}

/// Writes a length prefixed byte vector
pub fn write_var_bytes(writer: &mut dyn BufferWriter, bytes: &[u8]) {
    writer.write_u32_be_safe(bytes.len() as u32);
    writer.write_bytes_safe(bytes);
}

pub fn read_var_bytes(stream: &mut dyn Stream) -> anyhow::Result<Vec<u8>> {
    let len = stream.read_u32_be()? as usize;
    if len > stream.in_avail() {
        bail!("byte vector length {} exceeds stream", len);
    }
    let mut buffer = vec![0; len];
    stream.read_bytes(&mut buffer, len)?;
    Ok(buffer)
}

pub fn seconds_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn get_env_or_default_string(variable_name: &str, default_value: impl Into<String>) -> String {
    std::env::var(variable_name).unwrap_or_else(|_| default_value.into())
}
