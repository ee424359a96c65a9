use crate::{BoxError, CallContext};
use alloy_primitives::{Bytes, U256};
use async_trait::async_trait;
use std::{fmt, future::Future, sync::Arc};

/// The answer to a `pubkey(node)` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pubkey {
    /// A point, encoded as `(uint256 x, uint256 y)`.
    Coordinates {
        /// The x coordinate.
        x: U256,
        /// The y coordinate.
        y: U256,
    },
    /// Already encoded return data, returned without further encoding.
    Raw(Bytes),
}

/// The answer to an `ABI(node, contentTypes)` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAbi {
    /// A content type and its data, encoded as `(uint256, bytes)`.
    Typed {
        /// The content type of `data`.
        content_type: U256,
        /// The abi in the given content type.
        data: Bytes,
    },
    /// Already encoded return data, returned without further encoding.
    Raw(Bytes),
}

/// The capabilities of a resolved name.
///
/// Every capability is optional: the default implementations return `Ok(None)`, which is
/// answered exactly like a missing value.
#[async_trait]
pub trait Record: Send + Sync {
    /// Returns the address for an ENSIP-9 / ENSIP-11 coin type.
    async fn addr(&self, _coin_type: U256) -> Result<Option<Bytes>, BoxError> {
        Ok(None)
    }

    /// Returns the text record for a key.
    async fn text(&self, _key: &str) -> Result<Option<String>, BoxError> {
        Ok(None)
    }

    /// Returns the content hash.
    async fn contenthash(&self) -> Result<Option<Bytes>, BoxError> {
        Ok(None)
    }

    /// Returns the public key.
    async fn pubkey(&self) -> Result<Option<Pubkey>, BoxError> {
        Ok(None)
    }

    /// Returns the reverse name.
    async fn name(&self) -> Result<Option<String>, BoxError> {
        Ok(None)
    }

    /// Returns the contract abi for a content type bitmask.
    async fn abi(&self, _content_types: U256) -> Result<Option<RecordAbi>, BoxError> {
        Ok(None)
    }
}

/// Finds the [`Record`] of a name.
///
/// The name is the dot-joined, unnormalized name from the request. A source may update the
/// origin or protocol of the context before returning; those values are used to sign the
/// response.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the record of `name`, if any.
    async fn record(
        &self,
        name: &str,
        context: &CallContext,
    ) -> Result<Option<Arc<dyn Record>>, BoxError>;
}

/// A [`RecordSource`] built from a closure, see [`record_source_fn`].
#[derive(Clone, Copy)]
pub struct RecordSourceFn<F>(F);

/// Creates a [`RecordSource`] from an async closure taking the name and the context.
pub const fn record_source_fn<F, Fut, E>(f: F) -> RecordSourceFn<F>
where
    F: Fn(&str, &CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Arc<dyn Record>>, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    RecordSourceFn(f)
}

#[async_trait]
impl<F, Fut, E> RecordSource for RecordSourceFn<F>
where
    F: Fn(&str, &CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<Arc<dyn Record>>, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    async fn record(
        &self,
        name: &str,
        context: &CallContext,
    ) -> Result<Option<Arc<dyn Record>>, BoxError> {
        (self.0)(name, context).await.map_err(Into::into)
    }
}

impl<F> fmt::Debug for RecordSourceFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSourceFn").finish_non_exhaustive()
    }
}
