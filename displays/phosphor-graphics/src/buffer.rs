//! Binary pixel buffer
//!
//! Rows run top to bottom and columns left to right. Coordinates are signed
//! so shapes may hang off any edge; writes outside the buffer are dropped.

/// A `W` x `H` grid of on/off pixels, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer<const W: usize, const H: usize> {
    rows: [[bool; W]; H],
}

impl<const W: usize, const H: usize> Default for PixelBuffer<W, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize, const H: usize> PixelBuffer<W, H> {
    /// Create an all-off buffer
    pub const fn new() -> Self {
        Self {
            rows: [[false; W]; H],
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        W
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        H
    }

    #[inline]
    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < W)?;
        let y = usize::try_from(y).ok().filter(|&y| y < H)?;
        Some((x, y))
    }

    /// Read a pixel; anything outside the buffer reads as off
    pub fn get(&self, x: i32, y: i32) -> bool {
        Self::index(x, y).is_some_and(|(x, y)| self.rows[y][x])
    }

    /// Turn a pixel on, clipping silently
    #[inline]
    pub fn set(&mut self, x: i32, y: i32) {
        if let Some((x, y)) = Self::index(x, y) {
            self.rows[y][x] = true;
        }
    }

    /// Turn a pixel off, clipping silently
    pub fn unset(&mut self, x: i32, y: i32) {
        if let Some((x, y)) = Self::index(x, y) {
            self.rows[y][x] = false;
        }
    }

    /// Set every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        for row in &mut self.rows {
            row.fill(on);
        }
    }

    /// Turn on `x0..=x1` in row `y`; an inverted range draws nothing
    pub fn hspan(&mut self, y: i32, x0: i32, x1: i32) {
        let Ok(y) = usize::try_from(y) else {
            return;
        };
        if y >= H || W == 0 {
            return;
        }
        let lo = x0.max(0);
        let hi = x1.min(W as i32 - 1);
        if lo > hi {
            return;
        }
        self.rows[y][lo as usize..=hi as usize].fill(true);
    }

    /// Turn on `y0..=y1` in column `x`; an inverted range draws nothing
    pub fn vspan(&mut self, x: i32, y0: i32, y1: i32) {
        for y in y0.max(0)..=y1.min(H as i32 - 1) {
            self.set(x, y);
        }
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> Option<&[bool; W]> {
        self.rows.get(y)
    }

    /// Number of lit pixels
    pub fn count_set(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&on| on).count())
            .sum()
    }

    /// Iterate over the coordinates of lit pixels, row by row
    pub fn iter_set(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &on)| on)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// OR another buffer of the same size into this one
    pub fn merge(mut self, other: &Self) -> Self {
        for (dst, src) in self.rows.iter_mut().zip(other.rows.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d |= *s;
            }
        }
        self
    }
}

impl<const W: usize, const H: usize> core::fmt::Debug for PixelBuffer<W, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "PixelBuffer<{}x{}>", W, H)?;
        for row in &self.rows {
            for &on in row {
                f.write_str(if on { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl<const W: usize, const H: usize> defmt::Format for PixelBuffer<W, H> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PixelBuffer[{}x{}, {} set]", W, H, self.count_set());
    }
}
