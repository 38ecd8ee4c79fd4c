use anyhow::Result;

/// Infallible sink for binary serialization
pub trait BufferWriter {
    fn write_bytes_safe(&mut self, bytes: &[u8]);

    fn write_u8_safe(&mut self, value: u8) {
        self.write_bytes_safe(&[value]);
    }

    fn write_u32_be_safe(&mut self, value: u32) {
        self.write_bytes_safe(&value.to_be_bytes());
    }

    fn write_u64_be_safe(&mut self, value: u64) {
        self.write_bytes_safe(&value.to_be_bytes());
    }
}

pub trait Stream {
    fn read_u8(&mut self) -> Result<u8>;
    fn read_bytes(&mut self, buffer: &mut [u8], len: usize) -> Result<()>;
    fn in_avail(&self) -> usize;

    fn read_u32_be(&mut self) -> Result<u32> {
        let mut buffer = [0u8; 4];
        self.read_bytes(&mut buffer, 4)?;
        Ok(u32::from_be_bytes(buffer))
    }

    fn read_u64_be(&mut self) -> Result<u64> {
        let mut buffer = [0u8; 8];
        self.read_bytes(&mut buffer, 8)?;
        Ok(u64::from_be_bytes(buffer))
    }
}

#[derive(Default)]
pub struct MemoryStream {
    bytes: Vec<u8>,
    read_index: usize,
}

impl MemoryStream {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl BufferWriter for MemoryStream {
    fn write_bytes_safe(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }
}

impl Stream for MemoryStream {
    fn read_u8(&mut self) -> Result<u8> {
        if self.read_index >= self.bytes.len() {
            bail!("no more bytes to read")
        }

        let result = self.bytes[self.read_index];
        self.read_index += 1;
        Ok(result)
    }

    fn read_bytes(&mut self, buffer: &mut [u8], len: usize) -> Result<()> {
        if self.read_index + len > self.bytes.len() {
            bail!("not enough bytes to read")
        }

        buffer[..len].copy_from_slice(&self.bytes[self.read_index..self.read_index + len]);
        self.read_index += len;
        Ok(())
    }

    fn in_avail(&self) -> usize {
        self.bytes.len() - self.read_index
    }
}

/// Reads from a borrowed buffer, e.g. a value returned by the database
pub struct BufferReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BufferReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.buffer[self.position..]
    }
}

impl<'a> Stream for BufferReader<'a> {
    fn read_u8(&mut self) -> Result<u8> {
        if self.position < self.buffer.len() {
            let result = self.buffer[self.position];
            self.position += 1;
            Ok(result)
        } else {
            Err(anyhow!("Trying to read past end of stream"))
        }
    }

    fn read_bytes(&mut self, buffer: &mut [u8], len: usize) -> Result<()> {
        if self.position + len > self.buffer.len() {
            return Err(anyhow!("Trying to read past end of stream"));
        }

        buffer[..len].copy_from_slice(&self.buffer[self.position..self.position + len]);
        self.position += len;
        Ok(())
    }

    fn in_avail(&self) -> usize {
        self.buffer.len() - self.position
    }
}
