use crate::{Error, ParameterAccessor, ParameterRef, ScytheResult, ValidationError};
use scythe_common_types::{NormalizedValue, ProbeSteps};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Asks for the normalized value at which a control displays a certain text.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeRequest {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub parameter: ParameterRef,
    /// Compared case-insensitively, ignoring surrounding whitespace.
    pub target_display: String,
    #[cfg_attr(feature = "serde", serde(default = "default_probe_min"))]
    pub probe_min: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_probe_max"))]
    pub probe_max: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_probe_steps"))]
    pub probe_steps: u32,
}

fn default_probe_min() -> f64 {
    NormalizedValue::MIN.get()
}

fn default_probe_max() -> f64 {
    NormalizedValue::MAX.get()
}

fn default_probe_steps() -> u32 {
    ProbeSteps::DEFAULT.get()
}

impl ProbeRequest {
    /// Creates a request which scans the complete range with the default step count.
    pub fn new(parameter: ParameterRef, target_display: impl Into<String>) -> Self {
        Self {
            parameter,
            target_display: target_display.into(),
            probe_min: default_probe_min(),
            probe_max: default_probe_max(),
            probe_steps: default_probe_steps(),
        }
    }

    pub fn with_interval(mut self, probe_min: f64, probe_max: f64) -> Self {
        self.probe_min = probe_min;
        self.probe_max = probe_max;
        self
    }

    pub fn with_steps(mut self, probe_steps: u32) -> Self {
        self.probe_steps = probe_steps;
        self
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeResult {
    pub found: bool,
    /// The lowest probed value which displays the target text.
    pub internal_value: Option<NormalizedValue>,
    /// The text as displayed by the host (might differ in case or whitespace from the target).
    pub matched_display: Option<String>,
    pub target_display: String,
    pub original_value: NormalizedValue,
    pub original_display: String,
    /// Whether the control has been set back to `original_value`.
    pub restored: bool,
    pub probe_steps: u32,
    pub probe_min: f64,
    pub probe_max: f64,
}

/// A validated probe request.
#[derive(Copy, Clone, Debug)]
struct ProbePlan {
    min: NormalizedValue,
    max: NormalizedValue,
    steps: ProbeSteps,
}

impl ProbePlan {
    fn from_request(request: &ProbeRequest) -> Result<ProbePlan, ValidationError> {
        let (min, max) = (request.probe_min, request.probe_max);
        let out_of_range = || ValidationError::IntervalOutOfRange { min, max };
        let min_value = NormalizedValue::try_from(min).map_err(|_| out_of_range())?;
        let max_value = NormalizedValue::try_from(max).map_err(|_| out_of_range())?;
        if min_value >= max_value {
            return Err(ValidationError::EmptyInterval { min, max });
        }
        let steps = ProbeSteps::try_from(request.probe_steps)
            .map_err(|e| ValidationError::InvalidStepCount(e.value()))?;
        Ok(ProbePlan {
            min: min_value,
            max: max_value,
            steps,
        })
    }

    fn step_size(&self) -> f64 {
        (self.max.get() - self.min.get()) / self.steps.get() as f64
    }

    /// Candidates in ascending order, both interval bounds included.
    fn candidates(&self) -> impl Iterator<Item = NormalizedValue> {
        let min = self.min.get();
        let step_size = self.step_size();
        (0..=self.steps.get())
            .map(move |i| NormalizedValue::new_clamped(min + i as f64 * step_size))
    }
}

/// Finds normalized control values by their displayed text.
///
/// Hosts usually don't publish how a normalized value maps to what a control displays. The
/// mapping is often non-linear (e.g. logarithmic frequencies) and plateaued (several normalized
/// values display the same text). The engine therefore simply tries: it walks through the search
/// interval in equal steps, writes each candidate and reads back the display text. The first
/// (lowest) candidate whose text matches wins.
///
/// Probing has no net effect on the control. Whatever happens during the scan, the control is set
/// back to its original value before [`probe`] returns. This even holds if the scan is aborted by
/// a panic. Only if that final write fails, the caller gets [`Error::RestoreFailed`].
///
/// [`probe`]: #method.probe
#[derive(Debug)]
pub struct ProbeEngine<'a, H: ?Sized> {
    host: &'a H,
}

impl<'a, H: ParameterAccessor + ?Sized> ProbeEngine<'a, H> {
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Executes the request.
    ///
    /// Costs at most one write/read round trip per candidate (see
    /// [`ProbeSteps::candidate_count`]) plus the final restore write.
    pub fn probe(&self, request: &ProbeRequest) -> ScytheResult<ProbeResult> {
        let plan = ProbePlan::from_request(request)?;
        let param = request.parameter;
        let count = self.host.parameter_count(param.fx)?;
        if param.index >= count {
            return Err(ValidationError::ParameterIndexOutOfRange {
                index: param.index,
                count,
            }
            .into());
        }
        let original_value = self.host.normalized_value(param)?;
        let original_display = self.host.formatted_value(param)?;
        tracing::debug!(
            %param,
            target = %request.target_display,
            steps = plan.steps.get(),
            candidates = plan.steps.candidate_count(),
            min = plan.min.get(),
            max = plan.max.get(),
            "probing"
        );
        let guard = RestoreGuard::new(self.host, param, original_value);
        let scan_result = self.scan(param, &plan, &request.target_display);
        let restore_result = guard.restore();
        let mut result = ProbeResult {
            found: false,
            internal_value: None,
            matched_display: None,
            target_display: request.target_display.clone(),
            original_value,
            original_display,
            restored: restore_result.is_ok(),
            probe_steps: plan.steps.get(),
            probe_min: plan.min.get(),
            probe_max: plan.max.get(),
        };
        let scan_result = scan_result.map(|probe_match| {
            if let Some((value, display)) = probe_match {
                result.found = true;
                result.internal_value = Some(value);
                result.matched_display = Some(display);
            }
        });
        match restore_result {
            Ok(()) => {
                scan_result?;
                Ok(result)
            }
            Err(restore_error) => {
                tracing::error!(
                    %param,
                    original_value = original_value.get(),
                    error = %restore_error,
                    "couldn't restore parameter after probing"
                );
                Err(Error::RestoreFailed {
                    target: param.to_string(),
                    source: restore_error,
                    cause: scan_result.err().map(Box::new),
                    probe_result: Some(Box::new(result)),
                })
            }
        }
    }

    fn scan(
        &self,
        param: ParameterRef,
        plan: &ProbePlan,
        target_display: &str,
    ) -> ScytheResult<Option<(NormalizedValue, String)>> {
        let target = normalize_display(target_display);
        for candidate in plan.candidates() {
            self.host.set_normalized_value(param, candidate)?;
            let text = self.host.formatted_value(param)?;
            if normalize_display(&text) == target {
                tracing::debug!(%param, value = candidate.get(), matched = %text, "found match");
                return Ok(Some((candidate, text)));
            }
        }
        Ok(None)
    }
}

fn normalize_display(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Holds the original value of a control while it's being modified.
///
/// Call [`restore`] to write the original value back and learn whether that worked. If the guard
/// is dropped without that (early return, panic), it restores on drop and can only log failures.
///
/// [`restore`]: #method.restore
struct RestoreGuard<'a, H: ParameterAccessor + ?Sized> {
    host: &'a H,
    param: ParameterRef,
    original_value: NormalizedValue,
    armed: bool,
}

impl<'a, H: ParameterAccessor + ?Sized> RestoreGuard<'a, H> {
    fn new(host: &'a H, param: ParameterRef, original_value: NormalizedValue) -> Self {
        Self {
            host,
            param,
            original_value,
            armed: true,
        }
    }

    fn restore(mut self) -> Result<(), crate::HostError> {
        self.armed = false;
        self.host.set_normalized_value(self.param, self.original_value)
    }
}

impl<'a, H: ParameterAccessor + ?Sized> Drop for RestoreGuard<'a, H> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(param = %self.param, "probe aborted, restoring parameter");
        if let Err(e) = self.host.set_normalized_value(self.param, self.original_value) {
            tracing::error!(
                param = %self.param,
                original_value = self.original_value.get(),
                error = %e,
                "couldn't restore parameter after aborted probe"
            );
        }
    }
}
