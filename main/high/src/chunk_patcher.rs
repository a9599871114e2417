use crate::undo_block::UndoBlock;
use crate::{
    ChunkAccessor, ChunkObjectRef, EnvelopeProperties, EnvelopeRef, Error, ScytheResult,
    UndoAccessor,
};
use scythe_chunk::{AppliedField, Chunk, ChunkEdits, PatchError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Asks for certain fields in the state chunk of an object to be changed.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PatchRequest {
    pub object: ChunkObjectRef,
    pub fields: ChunkEdits,
}

impl PatchRequest {
    pub fn new(object: impl Into<ChunkObjectRef>, fields: ChunkEdits) -> Self {
        Self {
            object: object.into(),
            fields,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PatchResult {
    pub applied_fields: Vec<AppliedField>,
    pub new_blob: String,
    /// `false` if the chunk already contained all values, in which case nothing was written.
    pub written: bool,
}

/// Edits state chunk fields of host objects.
///
/// Each call reads the chunk once, applies all edits in one pass (see [`scythe_chunk::patch`])
/// and writes the result back once, wrapped in an undo block. So readers of the object never
/// observe a partially edited state.
///
/// If the host rejects the write, the original chunk is written back. If even that fails, the
/// caller gets [`Error::RestoreFailed`].
#[derive(Debug)]
pub struct ChunkPatcher<'a, H: ?Sized> {
    host: &'a H,
}

impl<'a, H: ChunkAccessor + UndoAccessor + ?Sized> ChunkPatcher<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    pub fn patch_object(&self, request: &PatchRequest) -> ScytheResult<PatchResult> {
        request.fields.validate()?;
        let object = request.object;
        let original = self.host.state_chunk(object)?;
        let patched = scythe_chunk::patch(&original, &request.fields)?;
        if patched.content() == original {
            tracing::debug!(%object, "chunk already up to date, skipping write");
            return Ok(PatchResult {
                applied_fields: patched.applied_fields().to_vec(),
                new_blob: patched.into_content(),
                written: false,
            });
        }
        let label = format!("Edit {} of {object}", field_list(&request.fields));
        let _undo_block = UndoBlock::begin(self.host, label)?;
        if let Err(write_error) = self.host.set_state_chunk(object, patched.content()) {
            tracing::warn!(%object, error = %write_error, "chunk write failed, restoring original");
            let cause = Error::from(write_error);
            return match self.host.set_state_chunk(object, &original) {
                Ok(()) => Err(cause),
                Err(restore_error) => {
                    tracing::error!(
                        %object,
                        error = %restore_error,
                        "couldn't restore original chunk"
                    );
                    Err(Error::RestoreFailed {
                        target: object.to_string(),
                        source: restore_error,
                        cause: Some(Box::new(cause)),
                        probe_result: None,
                    })
                }
            };
        }
        Ok(PatchResult {
            applied_fields: patched.applied_fields().to_vec(),
            new_blob: patched.into_content(),
            written: true,
        })
    }

    /// Changes active state, visibility and/or default point shape of an envelope.
    pub fn set_envelope_properties(
        &self,
        envelope: EnvelopeRef,
        properties: &EnvelopeProperties,
    ) -> ScytheResult<PatchResult> {
        if properties.is_empty() {
            return Err(PatchError::EmptyEditSet.into());
        }
        self.patch_object(&PatchRequest::new(envelope, properties.to_chunk_edits()))
    }

    /// Reads active state, visibility and default point shape of an envelope.
    pub fn envelope_properties(&self, envelope: EnvelopeRef) -> ScytheResult<EnvelopeProperties> {
        let content = self.host.state_chunk(envelope.into())?;
        if content.trim().is_empty() {
            return Err(PatchError::EmptyChunk.into());
        }
        Ok(EnvelopeProperties::from_chunk(&Chunk::parse(&content)))
    }
}

fn field_list(edits: &ChunkEdits) -> String {
    edits
        .provided()
        .map(|(token, _)| token)
        .collect::<Vec<_>>()
        .join(", ")
}
