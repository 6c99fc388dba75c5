//!
//! Async counterparts of [`marshal`](crate::marshal) and [`unmarshal`](crate::unmarshal) over `futures` byte streams.
//!

use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{DecodeError, EncodeError};
use crate::{schema, Decoder, EbmlMarshal, Encoder};

///
/// Encodes `value` with the global schema and writes it to `dest`.
///
/// Encoding happens before the first write, so a failed encode leaves `dest` untouched.
///
pub async fn marshal_async<T, W>(value: &T, dest: &mut W) -> Result<(), EncodeError>
    where
        T: EbmlMarshal,
        W: AsyncWrite + Unpin
{
    let bytes = Encoder::new(schema::global()?).encode(value)?;
    dest.write_all(&bytes).await.map_err(|source| EncodeError::WriteError { source })?;
    dest.flush().await.map_err(|source| EncodeError::WriteError { source })
}

///
/// Reads `source` to its end and decodes the data into `value` with the global schema.
///
/// As with [`unmarshal`](crate::unmarshal), `value` is only replaced once the whole document decoded.
///
pub async fn unmarshal_async<T, R>(source: &mut R, value: &mut T) -> Result<(), DecodeError>
    where
        T: EbmlMarshal + Clone,
        R: AsyncRead + Unpin
{
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer).await.map_err(|source| DecodeError::ReadError { source })?;
    let mut decoded = value.clone();
    Decoder::new(schema::global()?, &buffer).decode(&mut decoded)?;
    *value = decoded;
    Ok(())
}
