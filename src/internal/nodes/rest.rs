use crate::{Context, Node, NodeKind, Outcome, Result, Tx};

const REST_CHUNK: usize = 4096;

/// Consumes everything up to the end of the stream.
pub(crate) struct Rest;

impl<T> Node<T> for Rest {
    fn update(&self, _ctx: &mut Context<'_, T>, tx: &mut Tx<'_>) -> Result<Outcome> {
        let mut chunk = vec![0u8; REST_CHUNK];
        while tx.read(&mut chunk)? == REST_CHUNK {}
        Ok(Outcome::Next)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Rest
    }
}
