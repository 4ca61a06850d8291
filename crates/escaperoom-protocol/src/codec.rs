//! Tokio codec for OSC messages carried in UDP datagrams.
//!
//! # Wire Format
//!
//! ```text
//! <address>\0<pad>  ,<tags>\0<pad>  <arg0> <arg1> ...
//! ```
//!
//! Strings are NUL-terminated and padded with NULs to a multiple of four
//! bytes. `i` and `f` arguments are four bytes big-endian.
//!
//! # Framing
//!
//! UDP preserves message boundaries, so one call to [`Decoder::decode`]
//! consumes the whole buffer as one packet. The codec is meant to be used
//! with `tokio_util::udp::UdpFramed` on the receive side; the send side
//! encodes into a buffer and hands it to a non-blocking socket write.
//!
//! ```
//! use bytes::BytesMut;
//! use tokio_util::codec::{Decoder, Encoder};
//! use escaperoom_protocol::{OscCodec, OscMessage};
//!
//! let mut codec = OscCodec::new();
//! let mut buffer = BytesMut::new();
//! codec.encode(OscMessage::with_int("/a", 1), &mut buffer).unwrap();
//!
//! let decoded = codec.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(decoded.address, "/a");
//! ```

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::message::{OscArg, OscMessage};
use escaperoom_core::constants::MAX_PACKET_SIZE;
use escaperoom_core::{Error, Result};

const BUNDLE_TAG: &str = "#bundle";

/// OSC packet codec.
#[derive(Debug, Clone)]
pub struct OscCodec {
    /// Packets larger than this are rejected in both directions.
    max_packet_size: usize,
}

impl OscCodec {
    /// Create a codec with the default packet size limit.
    pub fn new() -> Self {
        Self {
            max_packet_size: MAX_PACKET_SIZE,
        }
    }

    /// Create a codec with a custom packet size limit.
    pub fn with_max_packet_size(max_packet_size: usize) -> Self {
        Self { max_packet_size }
    }

    pub fn max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    /// Encode a message into a fresh buffer.
    ///
    /// Used by the send path, which writes datagrams without going through
    /// a `Sink`.
    pub fn encode_to_vec(&mut self, message: OscMessage) -> Result<Vec<u8>> {
        let mut buffer = BytesMut::new();
        self.encode(message, &mut buffer)?;
        Ok(buffer.to_vec())
    }
}

impl Default for OscCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes needed to hold `len` bytes plus a NUL, rounded up to 4.
fn padded_len(len: usize) -> usize {
    (len + 4) & !3
}

fn put_padded_str(dst: &mut BytesMut, s: &str) {
    dst.put_slice(s.as_bytes());
    let padding = padded_len(s.len()) - s.len();
    dst.put_bytes(0, padding);
}

fn read_padded_str(src: &mut BytesMut) -> Result<String> {
    let end = src
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::MalformedPacket("unterminated string".to_string()))?;

    let total = padded_len(end);
    if total > src.len() {
        return Err(Error::MalformedPacket("string padding truncated".to_string()));
    }

    let text = std::str::from_utf8(&src[..end])
        .map_err(|_| Error::MalformedPacket("string is not UTF-8".to_string()))?
        .to_string();
    src.advance(total);
    Ok(text)
}

fn read_arg(tag: char, src: &mut BytesMut) -> Result<OscArg> {
    match tag {
        'i' | 'f' if src.remaining() < 4 => Err(Error::MalformedPacket(format!(
            "argument '{tag}' truncated"
        ))),
        'i' => Ok(OscArg::Int(src.get_i32())),
        'f' => Ok(OscArg::Float(src.get_f32())),
        's' => Ok(OscArg::Str(read_padded_str(src)?)),
        other => Err(Error::UnsupportedTypeTag(other)),
    }
}

impl Decoder for OscCodec {
    type Item = OscMessage;
    type Error = Error;

    /// Decode one datagram.
    ///
    /// Returns `Ok(None)` only for an empty buffer. Any other input is
    /// consumed entirely, whether it decodes or not, so a bad datagram never
    /// poisons the next one.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.is_empty() {
            return Ok(None);
        }

        let mut packet = src.split();

        if packet.len() > self.max_packet_size {
            return Err(Error::PacketTooLarge {
                size: packet.len(),
                max_size: self.max_packet_size,
            });
        }
        if packet.len() % 4 != 0 {
            return Err(Error::MalformedPacket(format!(
                "length {} is not a multiple of 4",
                packet.len()
            )));
        }

        let address = read_padded_str(&mut packet)?;
        if address == BUNDLE_TAG {
            return Err(Error::MalformedPacket("bundles are not supported".to_string()));
        }
        if !address.starts_with('/') {
            return Err(Error::InvalidAddress(address));
        }

        // Type tags are optional in older senders; no tags means no arguments.
        if packet.is_empty() {
            return Ok(Some(OscMessage::new(address, Vec::new())));
        }

        let tags = read_padded_str(&mut packet)?;
        let tags = tags
            .strip_prefix(',')
            .ok_or_else(|| Error::MalformedPacket("type tags must start with ','".to_string()))?;

        let args = tags
            .chars()
            .map(|tag| read_arg(tag, &mut packet))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(OscMessage::new(address, args)))
    }
}

impl Encoder<OscMessage> for OscCodec {
    type Error = Error;

    fn encode(&mut self, item: OscMessage, dst: &mut BytesMut) -> Result<()> {
        if !item.address.starts_with('/') || item.address.contains('\0') {
            return Err(Error::InvalidAddress(item.address));
        }

        let mut packet = BytesMut::with_capacity(64);
        put_padded_str(&mut packet, &item.address);

        let tags: String = std::iter::once(',')
            .chain(item.args.iter().map(OscArg::type_tag))
            .collect();
        put_padded_str(&mut packet, &tags);

        for arg in &item.args {
            match arg {
                OscArg::Int(v) => packet.put_i32(*v),
                OscArg::Float(v) => packet.put_f32(*v),
                OscArg::Str(s) => {
                    if s.contains('\0') {
                        return Err(Error::MalformedPacket(
                            "string argument contains NUL".to_string(),
                        ));
                    }
                    put_padded_str(&mut packet, s);
                }
            }
        }

        if packet.len() > self.max_packet_size {
            return Err(Error::PacketTooLarge {
                size: packet.len(),
                max_size: self.max_packet_size,
            });
        }

        dst.extend_from_slice(&packet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 4);
        assert_eq!(padded_len(3), 4);
        assert_eq!(padded_len(4), 8);
        assert_eq!(padded_len(7), 8);
    }

    #[test]
    fn test_encode_known_bytes() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::new();
        codec
            .encode(OscMessage::with_int("/ab", 1), &mut buffer)
            .unwrap();

        assert_eq!(
            &buffer[..],
            b"/ab\0,i\0\0\0\0\0\x01"
        );
    }

    #[test]
    fn test_decode_without_type_tags() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"/escaperoom/vaultdoor/lock\0\0"[..]);

        let msg = codec.decode(&mut buffer).unwrap().unwrap();
        assert_eq!(msg.address, "/escaperoom/vaultdoor/lock");
        assert!(msg.args.is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_empty_buffer() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::new();
        assert!(codec.decode(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn test_decode_mixed_args() {
        let mut codec = OscCodec::new();
        let msg = OscMessage::new(
            "/mix",
            vec![
                OscArg::Int(-7),
                OscArg::Float(0.25),
                OscArg::Str("hello".into()),
            ],
        );
        let mut buffer = BytesMut::new();
        codec.encode(msg.clone(), &mut buffer).unwrap();

        assert_eq!(buffer.len() % 4, 0);
        assert_eq!(codec.decode(&mut buffer).unwrap(), Some(msg));
    }

    #[test]
    fn test_decode_rejects_bundle() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"#bundle\0\0\0\0\0\0\0\0\x01"[..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(Error::MalformedPacket(_))
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_decode_rejects_unaligned() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"/ab\0,i\0"[..]);
        assert!(codec.decode(&mut buffer).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_int() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"/ab\0,ii\0\0\0\0\x01"[..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"/ab\0,b\0\0\0\0\0\x01"[..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(Error::UnsupportedTypeTag('b'))
        ));
    }

    #[test]
    fn test_decode_rejects_relative_address() {
        let mut codec = OscCodec::new();
        let mut buffer = BytesMut::from(&b"ab\0\0"[..]);
        assert!(matches!(
            codec.decode(&mut buffer),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_packet_size_limit() {
        let mut codec = OscCodec::with_max_packet_size(16);
        let msg = OscMessage::with_int("/a/very/long/address", 1);
        let mut buffer = BytesMut::new();
        assert!(matches!(
            codec.encode(msg, &mut buffer),
            Err(Error::PacketTooLarge { .. })
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_encode_rejects_bad_address() {
        let mut codec = OscCodec::new();
        assert!(codec.encode_to_vec(OscMessage::with_int("nope", 1)).is_err());
    }
}
