//! Length-prefixed framing on a byte stream.
//!
//! # Format
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────┐
//! │ Length           │ Body                         │
//! │ 4 bytes          │ exactly `Length` bytes       │
//! │ uint32 LE        │ (UTF-8 JSON envelope)        │
//! └──────────────────┴──────────────────────────────┘
//! ```
//!
//! The length is pinned to little-endian. Frames are never padded or
//! truncated: the header always equals the exact body byte count.
//!
//! The framer knows nothing about envelopes; it moves opaque byte bodies.

// ============================================================================
// Imports
// ============================================================================

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Width of the length header in bytes.
pub const FRAME_HEADER_LEN: usize = 4;

/// Default maximum body size (1 MiB), the vault service's own limit.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 1024 * 1024;

// ============================================================================
// Header Helpers
// ============================================================================

/// Encodes a body length as a frame header.
#[inline]
#[must_use]
pub const fn encode_header(length: u32) -> [u8; FRAME_HEADER_LEN] {
    length.to_le_bytes()
}

/// Decodes a frame header into a body length.
#[inline]
#[must_use]
pub const fn decode_header(header: [u8; FRAME_HEADER_LEN]) -> u32 {
    u32::from_le_bytes(header)
}

// ============================================================================
// Framer
// ============================================================================

/// Encodes and decodes length-prefixed frames.
///
/// An optional maximum body size is enforced in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    max_frame_size: Option<u32>,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl Framer {
    /// Creates a framer that rejects bodies larger than `max_frame_size`.
    #[inline]
    #[must_use]
    pub const fn new(max_frame_size: u32) -> Self {
        Self {
            max_frame_size: Some(max_frame_size),
        }
    }

    /// Creates a framer bounded only by the 32-bit length field.
    #[inline]
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            max_frame_size: None,
        }
    }

    /// Returns the configured maximum body size, if any.
    #[inline]
    #[must_use]
    pub const fn max_frame_size(&self) -> Option<u32> {
        self.max_frame_size
    }

    /// Returns `header ++ payload` for one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooLarge`] if the payload exceeds the limit.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>> {
        let length = self.ensure_fits(payload.len())?;

        let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
        frame.extend_from_slice(&encode_header(length));
        frame.extend_from_slice(payload);
        Ok(frame)
    }

    /// Writes one frame, looping until every byte is sent, then flushes.
    ///
    /// # Errors
    ///
    /// - [`Error::FrameTooLarge`] if the payload exceeds the limit
    /// - [`Error::Io`] if the write fails
    pub async fn write<W>(&self, writer: &mut W, payload: &[u8]) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let frame = self.encode(payload)?;
        writer.write_all(&frame).await?;
        writer.flush().await?;

        trace!(body_len = payload.len(), "Frame written");
        Ok(())
    }

    /// Reads exactly one frame and returns its body.
    ///
    /// Partial reads of any size are reassembled.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the stream ends before any header byte;
    ///   a clean close between frames is reported this way rather than as
    ///   [`Error::Framing`]
    /// - [`Error::Framing`] if the stream ends inside the header
    /// - [`Error::FrameTooLarge`] if the declared length exceeds the limit
    /// - [`Error::IncompleteMessage`] if the stream ends inside the body
    /// - [`Error::Io`] if the read fails
    pub async fn read<R>(&self, reader: &mut R) -> Result<Vec<u8>>
    where
        R: AsyncRead + Unpin,
    {
        let mut header = [0u8; FRAME_HEADER_LEN];
        let received = read_until_eof(reader, &mut header).await?;
        match received {
            0 => return Err(Error::ConnectionClosed),
            n if n < FRAME_HEADER_LEN => return Err(Error::framing(n)),
            _ => {}
        }

        let expected = decode_header(header) as usize;
        self.ensure_fits(expected)?;

        let mut body = vec![0u8; expected];
        let received = read_until_eof(reader, &mut body).await?;
        if received < expected {
            return Err(Error::incomplete_message(received, expected));
        }

        trace!(body_len = expected, "Frame read");
        Ok(body)
    }

    /// Checks a body length against the limit and the 32-bit length field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooLarge`] if the length does not fit.
    pub fn ensure_fits(&self, length: usize) -> Result<u32> {
        let limit = self.max_frame_size.unwrap_or(u32::MAX);
        match u32::try_from(length) {
            Ok(length) if length <= limit => Ok(length),
            _ => Err(Error::frame_too_large(length, limit)),
        }
    }
}

/// Fills `buf` from the reader, stopping early only at end of stream.
///
/// Returns the number of bytes read.
async fn read_until_eof<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

// ============================================================================
// Tests
// ============================================================================
