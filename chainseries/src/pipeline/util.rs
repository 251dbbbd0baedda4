use chainseries_core::{Capability, SeriesError};

/// Collapse a set of provider errors into a uniform `SeriesError` outcome.
///
/// Rules:
/// - If `attempted_any` is false → `Unsupported(capability)`.
/// - If all errors are `ProviderTimeout` → `AllProvidersTimedOut(capability)`.
/// - If `not_found_what` is `Some` and all errors are `NotFound` → `NotFound(what)`.
/// - Else → `AllProvidersFailed(errors)`.
pub fn collapse_errors(
    capability: Capability,
    attempted_any: bool,
    errors: Vec<SeriesError>,
    not_found_what: Option<String>,
) -> SeriesError {
    if !attempted_any {
        return SeriesError::unsupported(capability.to_string());
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, SeriesError::ProviderTimeout { .. }))
    {
        return SeriesError::AllProvidersTimedOut {
            capability: capability.to_string(),
        };
    }
    if let Some(what) = not_found_what
        && !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, SeriesError::NotFound { .. }))
    {
        return SeriesError::not_found(what);
    }
    SeriesError::AllProvidersFailed(errors)
}
