use crate::DisplayFn;
use scythe_common_types::NormalizedValue;
use scythe_high::{
    ChunkAccessor, ChunkObjectRef, FxRef, HostError, HostResult, ParameterAccessor, ParameterRef,
    UndoAccessor,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::{Bound, RangeBounds};

/// Everything the host has been asked to do, in order.
#[derive(Clone, PartialEq, Debug)]
pub enum HostCall {
    ParameterCount(FxRef),
    NormalizedValue(ParameterRef),
    SetNormalizedValue(ParameterRef, NormalizedValue),
    FormattedValue(ParameterRef),
    StateChunk(ChunkObjectRef),
    SetStateChunk(ChunkObjectRef, String),
    BeginUndoBlock,
    EndUndoBlock(String),
}

impl HostCall {
    pub fn kind(&self) -> CallKind {
        use HostCall::*;
        match self {
            ParameterCount(_) => CallKind::ParameterCount,
            NormalizedValue(_) => CallKind::NormalizedValue,
            SetNormalizedValue(..) => CallKind::SetNormalizedValue,
            FormattedValue(_) => CallKind::FormattedValue,
            StateChunk(_) => CallKind::StateChunk,
            SetStateChunk(..) => CallKind::SetStateChunk,
            BeginUndoBlock => CallKind::BeginUndoBlock,
            EndUndoBlock(_) => CallKind::EndUndoBlock,
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            HostCall::SetNormalizedValue(..) | HostCall::SetStateChunk(..)
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CallKind {
    ParameterCount,
    NormalizedValue,
    SetNormalizedValue,
    FormattedValue,
    StateChunk,
    SetStateChunk,
    BeginUndoBlock,
    EndUndoBlock,
}

/// What happens instead of the normal behavior of a call.
#[derive(Clone, Debug)]
pub enum Fault {
    /// The call returns this error and has no effect.
    Fail(HostError),
    /// The call panics and has no effect.
    Panic,
}

#[derive(Clone, Debug)]
struct FaultRule {
    kind: CallKind,
    // 1-based call numbers (per call kind) affected by this rule
    calls: (Bound<usize>, Bound<usize>),
    fault: Fault,
}

struct SimulatedParameter {
    value: NormalizedValue,
    display: DisplayFn,
}

#[derive(Default)]
struct HostState {
    fx_parameter_counts: HashMap<FxRef, u32>,
    parameters: HashMap<ParameterRef, SimulatedParameter>,
    chunks: HashMap<ChunkObjectRef, String>,
    journal: Vec<HostCall>,
    call_counts: HashMap<CallKind, usize>,
    fault_rules: Vec<FaultRule>,
    open_undo_blocks: usize,
}

/// In-memory host.
///
/// Records every call in a journal and can be told to fail or panic on specific calls. Calls
/// which fail or panic are journaled but have no effect.
#[derive(Default)]
pub struct SimulatedHost {
    state: RefCell<HostState>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a control. The FX is created implicitly and grows to contain the given index.
    pub fn add_parameter(&self, param: ParameterRef, value: NormalizedValue, display: DisplayFn) {
        let mut state = self.state.borrow_mut();
        let count = state.fx_parameter_counts.entry(param.fx).or_insert(0);
        *count = (*count).max(param.index + 1);
        state
            .parameters
            .insert(param, SimulatedParameter { value, display });
    }

    pub fn add_chunk(&self, object: ChunkObjectRef, content: impl Into<String>) {
        self.state
            .borrow_mut()
            .chunks
            .insert(object, content.into());
    }

    /// Makes the calls of the given kind with the given (1-based) numbers fail or panic.
    pub fn inject_fault(&self, kind: CallKind, calls: impl RangeBounds<usize>, fault: Fault) {
        self.state.borrow_mut().fault_rules.push(FaultRule {
            kind,
            calls: (calls.start_bound().cloned(), calls.end_bound().cloned()),
            fault,
        });
    }

    /// Makes every following call fail as if the host had gone away.
    pub fn disconnect(&self) {
        use CallKind::*;
        let fault = Fault::Fail(HostError::unavailable("connection lost"));
        for kind in [
            ParameterCount,
            NormalizedValue,
            SetNormalizedValue,
            FormattedValue,
            StateChunk,
            SetStateChunk,
            BeginUndoBlock,
            EndUndoBlock,
        ] {
            let next_call = self.call_count(kind) + 1;
            self.inject_fault(kind, next_call.., fault.clone());
        }
    }

    /// Current value of the control, read without going through (and being journaled as) a call.
    pub fn live_value(&self, param: ParameterRef) -> Option<NormalizedValue> {
        self.state.borrow().parameters.get(&param).map(|p| p.value)
    }

    pub fn live_chunk(&self, object: ChunkObjectRef) -> Option<String> {
        self.state.borrow().chunks.get(&object).cloned()
    }

    pub fn journal(&self) -> Vec<HostCall> {
        self.state.borrow().journal.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state
            .borrow()
            .journal
            .iter()
            .filter(|c| c.is_write())
            .count()
    }

    pub fn call_count(&self, kind: CallKind) -> usize {
        self.state
            .borrow()
            .call_counts
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    pub fn open_undo_blocks(&self) -> usize {
        self.state.borrow().open_undo_blocks
    }

    /// Forgets all journaled calls (fault rules keep counting from the start again, too).
    pub fn clear_journal(&self) {
        let mut state = self.state.borrow_mut();
        state.journal.clear();
        state.call_counts.clear();
    }

    /// Journals the call and checks whether a fault applies.
    fn enter(&self, call: HostCall) -> HostResult<()> {
        let fault = {
            let mut state = self.state.borrow_mut();
            let kind = call.kind();
            let count = state.call_counts.entry(kind).or_insert(0);
            *count += 1;
            let number = *count;
            state.journal.push(call);
            state
                .fault_rules
                .iter()
                .find(|r| r.kind == kind && r.calls.contains(&number))
                .map(|r| r.fault.clone())
        };
        match fault {
            None => Ok(()),
            Some(Fault::Fail(e)) => Err(e),
            Some(Fault::Panic) => panic!("simulated host panicked"),
        }
    }

    fn with_parameter<R>(
        &self,
        param: ParameterRef,
        f: impl FnOnce(&mut SimulatedParameter) -> R,
    ) -> HostResult<R> {
        let mut state = self.state.borrow_mut();
        let p = state
            .parameters
            .get_mut(&param)
            .ok_or_else(|| HostError::not_found(param))?;
        Ok(f(p))
    }
}

impl ParameterAccessor for SimulatedHost {
    fn parameter_count(&self, fx: FxRef) -> HostResult<u32> {
        self.enter(HostCall::ParameterCount(fx))?;
        self.state
            .borrow()
            .fx_parameter_counts
            .get(&fx)
            .copied()
            .ok_or_else(|| HostError::not_found(fx))
    }

    fn normalized_value(&self, param: ParameterRef) -> HostResult<NormalizedValue> {
        self.enter(HostCall::NormalizedValue(param))?;
        self.with_parameter(param, |p| p.value)
    }

    fn set_normalized_value(&self, param: ParameterRef, value: NormalizedValue) -> HostResult<()> {
        self.enter(HostCall::SetNormalizedValue(param, value))?;
        self.with_parameter(param, |p| p.value = value)
    }

    fn formatted_value(&self, param: ParameterRef) -> HostResult<String> {
        self.enter(HostCall::FormattedValue(param))?;
        self.with_parameter(param, |p| (p.display)(p.value))
    }
}

impl ChunkAccessor for SimulatedHost {
    fn state_chunk(&self, object: ChunkObjectRef) -> HostResult<String> {
        self.enter(HostCall::StateChunk(object))?;
        self.state
            .borrow()
            .chunks
            .get(&object)
            .cloned()
            .ok_or_else(|| HostError::not_found(object))
    }

    fn set_state_chunk(&self, object: ChunkObjectRef, chunk: &str) -> HostResult<()> {
        self.enter(HostCall::SetStateChunk(object, chunk.to_string()))?;
        let mut state = self.state.borrow_mut();
        let existing = state
            .chunks
            .get_mut(&object)
            .ok_or_else(|| HostError::not_found(object))?;
        *existing = chunk.to_string();
        Ok(())
    }
}

impl UndoAccessor for SimulatedHost {
    fn begin_undo_block(&self) -> HostResult<()> {
        self.enter(HostCall::BeginUndoBlock)?;
        self.state.borrow_mut().open_undo_blocks += 1;
        Ok(())
    }

    fn end_undo_block(&self, label: &str) -> HostResult<()> {
        self.enter(HostCall::EndUndoBlock(label.to_string()))?;
        let mut state = self.state.borrow_mut();
        state.open_undo_blocks = state.open_undo_blocks.saturating_sub(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_display;

    #[test]
    fn faults_apply_to_numbered_calls() {
        let host = SimulatedHost::new();
        let param = FxRef::new(0, 0).parameter(0);
        host.add_parameter(param, NormalizedValue::new(0.5), db_display(-12.0, 12.0));
        host.inject_fault(
            CallKind::SetNormalizedValue,
            2..=2,
            Fault::Fail(HostError::rejected_write("nope")),
        );
        assert!(host
            .set_normalized_value(param, NormalizedValue::new(0.1))
            .is_ok());
        assert_eq!(
            host.set_normalized_value(param, NormalizedValue::new(0.2)),
            Err(HostError::rejected_write("nope"))
        );
        assert_eq!(host.live_value(param), Some(NormalizedValue::new(0.1)));
        assert!(host
            .set_normalized_value(param, NormalizedValue::new(0.3))
            .is_ok());
        assert_eq!(host.write_count(), 3);
        assert_eq!(host.formatted_value(param).unwrap(), "-4.8 dB");
    }

    #[test]
    fn unknown_objects() {
        let host = SimulatedHost::new();
        assert!(matches!(
            host.parameter_count(FxRef::new(3, 0)),
            Err(HostError::NotFound(_))
        ));
        assert!(matches!(
            host.state_chunk(ChunkObjectRef::Track { track_index: 0 }),
            Err(HostError::NotFound(_))
        ));
    }

    #[test]
    fn disconnect() {
        let host = SimulatedHost::new();
        let param = FxRef::new(0, 0).parameter(2);
        host.add_parameter(param, NormalizedValue::MIN, db_display(-12.0, 12.0));
        assert_eq!(host.parameter_count(param.fx), Ok(3));
        host.disconnect();
        assert!(matches!(
            host.parameter_count(param.fx),
            Err(HostError::Unavailable(_))
        ));
        assert!(matches!(host.begin_undo_block(), Err(HostError::Unavailable(_))));
        assert_eq!(host.open_undo_blocks(), 0);
    }
}
