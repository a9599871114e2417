use crate::{HostResult, UndoAccessor};

// Constructor takes care of starting the undo block. Destructor takes care of ending the undo block
// (RAII).
pub(crate) struct UndoBlock<'a, H: UndoAccessor + ?Sized> {
    host: &'a H,
    label: String,
}

impl<'a, H: UndoAccessor + ?Sized> UndoBlock<'a, H> {
    pub(crate) fn begin(host: &'a H, label: String) -> HostResult<UndoBlock<'a, H>> {
        host.begin_undo_block()?;
        Ok(UndoBlock { host, label })
    }
}

impl<H: UndoAccessor + ?Sized> Drop for UndoBlock<'_, H> {
    fn drop(&mut self) {
        if let Err(e) = self.host.end_undo_block(&self.label) {
            tracing::warn!(label = %self.label, error = %e, "couldn't end undo block");
        }
    }
}
