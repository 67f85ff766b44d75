//! Pin resolution
//!
//! The display needs two outputs (SIN, SCK), an optional reset output and
//! an optional SBUSY input. Each may be handed over as a ready pin or as a
//! GPIO number; numbers are claimed in a [`PinRegistry`] and built through
//! the caller's factory, once.

use phosphor_hal::{PinRegistry, Source};

use crate::config::PinAssignment;
use crate::error::VfdError;

/// Resolved display pins
pub struct VfdPins<O, I> {
    pub sin: O,
    pub sck: O,
    pub reset: Option<O>,
    pub busy: Option<I>,
}

/// Resolve pin sources into concrete pins
///
/// `output` builds output pins and `input` builds the SBUSY input from a
/// GPIO number. On error, identifiers claimed by earlier pins stay claimed
/// so the registry reflects the pins that were actually constructed.
pub fn resolve_pins<O, I, FO, FI>(
    sin: Source<O>,
    sck: Source<O>,
    reset: Option<Source<O>>,
    busy: Option<Source<I>>,
    registry: &mut PinRegistry,
    mut output: FO,
    input: FI,
) -> Result<VfdPins<O, I>, VfdError>
where
    FO: FnMut(u8) -> Option<O>,
    FI: FnOnce(u8) -> Option<I>,
{
    let sin = sin.resolve_with(registry, &mut output)?;
    let sck = sck.resolve_with(registry, &mut output)?;
    let reset = reset
        .map(|source| source.resolve_with(registry, &mut output))
        .transpose()?;
    let busy = busy
        .map(|source| source.resolve_with(registry, input))
        .transpose()?;

    debug!(
        "VFD pins resolved ({} claimed)",
        registry.claimed_count()
    );

    Ok(VfdPins {
        sin,
        sck,
        reset,
        busy,
    })
}

impl<O, I> VfdPins<O, I> {
    /// Build every pin of an assignment by number
    pub fn from_assignment<FO, FI>(
        assignment: &PinAssignment,
        registry: &mut PinRegistry,
        output: FO,
        input: FI,
    ) -> Result<Self, VfdError>
    where
        FO: FnMut(u8) -> Option<O>,
        FI: FnOnce(u8) -> Option<I>,
    {
        resolve_pins(
            Source::Id(assignment.sin),
            Source::Id(assignment.sck),
            assignment.reset.map(Source::Id),
            assignment.busy.map(Source::Id),
            registry,
            output,
            input,
        )
    }
}
