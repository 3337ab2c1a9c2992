//! Pure-mode message framing

use crate::{Result, SlhDsaError};

/// Longest context string a signature can be bound to
pub const MAX_CONTEXT_LEN: usize = 255;

/// Frame `msg` for pure SLH-DSA: `0x00 ‖ len(ctx) ‖ ctx ‖ msg`.
///
/// # Errors
///
/// Returns [`SlhDsaError::ContextTooLong`] if `ctx` exceeds 255 bytes.
pub fn frame_message(ctx: &[u8], msg: &[u8]) -> Result<Vec<u8>> {
    let ctx_len = u8::try_from(ctx.len()).map_err(|_| SlhDsaError::ContextTooLong(ctx.len()))?;

    let mut framed = Vec::with_capacity(2 + ctx.len() + msg.len());
    framed.push(0x00);
    framed.push(ctx_len);
    framed.extend_from_slice(ctx);
    framed.extend_from_slice(msg);
    Ok(framed)
}
