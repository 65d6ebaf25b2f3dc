//! Typed wrappers over the four transport verbs. A backend refusal
//! (`ok: false`) becomes [`EngineError::Rejected`].

use super::error::{EngineError, Result};
use crate::transport::{Collection, Filter, Patch, Record, Response, Transport, TransportError};

fn accept(collection: Collection, response: Response) -> Result<Response> {
    if response.ok {
        return Ok(response);
    }
    Err(EngineError::Rejected {
        collection,
        message: response
            .message
            .unwrap_or_else(|| "request failed".to_string()),
    })
}

pub async fn create<T, R>(transport: &T, records: &[R]) -> Result<()>
where
    T: Transport + ?Sized,
    R: Record,
{
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(TransportError::from)?;
    let response = transport.create(R::COLLECTION, values).await?;
    accept(R::COLLECTION, response)?;
    Ok(())
}

pub async fn update<T, P>(transport: &T, filter: &Filter, patch: &P) -> Result<()>
where
    T: Transport + ?Sized,
    P: Patch,
{
    let value = serde_json::to_value(patch).map_err(TransportError::from)?;
    let response = transport.update(P::COLLECTION, filter, value).await?;
    accept(P::COLLECTION, response)?;
    Ok(())
}

pub async fn remove<T>(transport: &T, collection: Collection, filter: &Filter) -> Result<()>
where
    T: Transport + ?Sized,
{
    let response = transport.remove(collection, filter).await?;
    accept(collection, response)?;
    Ok(())
}

pub async fn read<T, R>(transport: &T, filter: Option<&Filter>) -> Result<Vec<R>>
where
    T: Transport + ?Sized,
    R: Record,
{
    let response = accept(R::COLLECTION, transport.read(R::COLLECTION, filter).await?)?;
    response.records().map_err(|source| EngineError::Decode {
        collection: R::COLLECTION,
        source,
    })
}
