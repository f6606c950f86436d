//! Cursor-based reader and node writer for the durable format.
//!
//! Every node is `[tag: u8][len: u32 LE][payload]`. Primitive fields
//! inside payloads are little-endian; strings are raw UTF-8 spanning the
//! whole payload unless a field is explicitly length-prefixed.

use crate::domain::errors::CodecError;

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.buf.len() - self.pos;
        if n > remaining {
            return Err(CodecError::Truncated {
                needed: n,
                remaining,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn u32(&mut self) -> Result<u32, CodecError> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("4-byte slice");
        Ok(u32::from_le_bytes(bytes))
    }

    pub(crate) fn i32(&mut self) -> Result<i32, CodecError> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("4-byte slice");
        Ok(i32::from_le_bytes(bytes))
    }

    pub(crate) fn i64(&mut self) -> Result<i64, CodecError> {
        let bytes: [u8; 8] = self.take(8)?.try_into().expect("8-byte slice");
        Ok(i64::from_le_bytes(bytes))
    }

    /// A length-prefixed UTF-8 string field.
    pub(crate) fn str_prefixed(&mut self) -> Result<String, CodecError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }

    /// The next child node: tag + payload slice.
    pub(crate) fn node(&mut self) -> Result<(u8, &'a [u8]), CodecError> {
        let tag = self.u8()?;
        let len = self.u32()? as usize;
        let remaining = self.buf.len() - self.pos;
        if len > remaining {
            return Err(CodecError::BadNodeLength { len });
        }
        let payload = self.take(len)?;
        Ok((tag, payload))
    }
}

/// Interpret a whole node payload as a UTF-8 string.
pub(crate) fn str_payload(payload: &[u8]) -> Result<String, CodecError> {
    String::from_utf8(payload.to_vec()).map_err(|_| CodecError::InvalidUtf8)
}

#[derive(Default)]
pub(crate) struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub(crate) fn node(&mut self, tag: u8, payload: &[u8]) {
        self.buf.push(tag);
        self.buf
            .extend_from_slice(&(payload.len() as u32).to_le_bytes());
        self.buf.extend_from_slice(payload);
    }

    pub(crate) fn str_node(&mut self, tag: u8, value: &str) {
        self.node(tag, value.as_bytes());
    }

    pub(crate) fn u8_node(&mut self, tag: u8, value: u8) {
        self.node(tag, &[value]);
    }

    pub(crate) fn u32_node(&mut self, tag: u8, value: u32) {
        self.node(tag, &value.to_le_bytes());
    }

    pub(crate) fn i32_node(&mut self, tag: u8, value: i32) {
        self.node(tag, &value.to_le_bytes());
    }

    pub(crate) fn i64_node(&mut self, tag: u8, value: i64) {
        self.node(tag, &value.to_le_bytes());
    }

    pub(crate) fn u32_raw(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn i32_raw(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub(crate) fn str_prefixed(&mut self, value: &str) {
        self.u32_raw(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_round_trip() {
        let mut w = Writer::new();
        w.str_node(0x42, "hello");
        w.u32_node(0x43, 7);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let (tag, payload) = r.node().unwrap();
        assert_eq!(tag, 0x42);
        assert_eq!(str_payload(payload).unwrap(), "hello");
        let (tag, payload) = r.node().unwrap();
        assert_eq!(tag, 0x43);
        assert_eq!(Reader::new(payload).u32().unwrap(), 7);
        assert!(r.is_empty());
    }

    #[test]
    fn truncated_primitive_is_an_error() {
        let mut r = Reader::new(&[0x01, 0x02]);
        assert!(matches!(r.u32(), Err(CodecError::Truncated { .. })));
    }

    #[test]
    fn node_length_cannot_overrun_parent() {
        // tag 0x01, claimed len 100, only 1 byte of payload follows.
        let bytes = [0x01, 100, 0, 0, 0, 0xFF];
        let mut r = Reader::new(&bytes);
        assert!(matches!(r.node(), Err(CodecError::BadNodeLength { .. })));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(matches!(
            str_payload(&[0xFF, 0xFE]),
            Err(CodecError::InvalidUtf8)
        ));
    }
}
