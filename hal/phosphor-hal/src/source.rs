//! Peripheral capability sources
//!
//! A driver can be handed a peripheral it should use as-is, or just the
//! number of the pin/bus it should claim. [`Source`] captures both and is
//! resolved exactly once, when the driver is built, so the rest of the
//! driver only ever sees concrete handles.

/// Number of GPIO identifiers accepted by [`PinRegistry`]
pub const PIN_COUNT: usize = 64;

/// Errors raised while resolving a [`Source`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// Identifier outside the supported range
    InvalidId(u8),
    /// Identifier already claimed by another source
    InUse(u8),
    /// The factory could not construct the peripheral
    Unavailable(u8),
}

/// Either an already-constructed peripheral or the identifier to build one from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source<T> {
    /// Use this handle directly
    Handle(T),
    /// Construct the peripheral from a pin or bus number
    Id(u8),
}

impl<T> Source<T> {
    /// Resolve into a concrete handle
    ///
    /// `build` is only called for [`Source::Id`]; a returned `None` maps to
    /// [`SourceError::Unavailable`].
    pub fn resolve<F>(self, build: F) -> Result<T, SourceError>
    where
        F: FnOnce(u8) -> Option<T>,
    {
        match self {
            Source::Handle(handle) => Ok(handle),
            Source::Id(id) => build(id).ok_or(SourceError::Unavailable(id)),
        }
    }

    /// Resolve, claiming the identifier in `registry` first
    ///
    /// Handles are passed through untouched; identifiers must be free.
    pub fn resolve_with<F>(self, registry: &mut PinRegistry, build: F) -> Result<T, SourceError>
    where
        F: FnOnce(u8) -> Option<T>,
    {
        if let Source::Id(id) = self {
            registry.claim(id)?;
            if let Some(handle) = build(id) {
                return Ok(handle);
            }
            registry.release(id);
            return Err(SourceError::Unavailable(id));
        }
        self.resolve(|_| None)
    }

    /// The identifier, if this source has not been constructed yet
    pub fn id(&self) -> Option<u8> {
        match self {
            Source::Handle(_) => None,
            Source::Id(id) => Some(*id),
        }
    }
}

impl Source<()> {
    /// Parse a pin identifier from text
    ///
    /// Supports `"gpio33"` and a bare `"33"`. Surrounding whitespace is
    /// ignored.
    pub fn parse(s: &str) -> Option<Source<()>> {
        let s = s.trim();
        let num_str = s.strip_prefix("gpio").unwrap_or(s);
        let id: u8 = num_str.parse().ok()?;

        if id as usize >= PIN_COUNT {
            return None;
        }

        Some(Source::Id(id))
    }
}

/// Tracks claimed identifiers so two sources cannot resolve to the same pin
#[derive(Debug, Clone, Default)]
pub struct PinRegistry {
    claimed: u64,
}

impl PinRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { claimed: 0 }
    }

    /// Claim an identifier
    pub fn claim(&mut self, id: u8) -> Result<(), SourceError> {
        if id as usize >= PIN_COUNT {
            return Err(SourceError::InvalidId(id));
        }
        if self.is_claimed(id) {
            return Err(SourceError::InUse(id));
        }
        self.claimed |= 1 << id;
        Ok(())
    }

    /// Release an identifier
    pub fn release(&mut self, id: u8) {
        if (id as usize) < PIN_COUNT {
            self.claimed &= !(1 << id);
        }
    }

    /// Check if an identifier is claimed
    pub fn is_claimed(&self, id: u8) -> bool {
        (id as usize) < PIN_COUNT && self.claimed & (1 << id) != 0
    }

    /// Number of claimed identifiers
    pub fn claimed_count(&self) -> usize {
        self.claimed.count_ones() as usize
    }
}
