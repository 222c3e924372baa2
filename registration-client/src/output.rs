//! Command output as JSON.

use std::io::Write;

use serde::Serialize;

use crate::error::{ClientError, Result};

/// Writes `value` to `out` as pretty-printed JSON followed by a newline.
///
/// The document is rendered in memory first, so a value that fails to serialize leaves
/// `out` untouched. Reading the bytes back yields a value equal to the one written.
///
/// # Errors
///
/// Returns [`ClientError::SerializationError`] if `value` cannot be represented as JSON
/// and [`ClientError::Io`] if writing or flushing fails.
///
/// # Examples
///
/// ```
/// use registration_client::output::write_to_output;
///
/// let mut out = Vec::new();
/// write_to_output(&mut out, &vec!["did:web:a", "did:web:b"]).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "[\n  \"did:web:a\",\n  \"did:web:b\"\n]\n");
/// ```
pub fn write_to_output<W, T>(out: &mut W, value: &T) -> Result<()>
where
    W: Write + ?Sized,
    T: Serialize + ?Sized,
{
    let mut rendered = serde_json::to_vec_pretty(value)
        .map_err(|e| ClientError::SerializationError(e.to_string()))?;
    rendered.push(b'\n');

    out.write_all(&rendered)?;
    out.flush()?;
    Ok(())
}
