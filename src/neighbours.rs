/*
  Copyright© 2023 Raúl Wolters(1)

  This file is part of rustronomy-binary-watershed.

  rustronomy is free software: you can redistribute it and/or modify it under
  the terms of the European Union Public License version 1.2 or later, as
  published by the European Commission.

  rustronomy is distributed in the hope that it will be useful, but WITHOUT ANY
  WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
  A PARTICULAR PURPOSE. See the European Union Public License for more details.

  You should have received a copy of the EUPL in an/all official language(s) of
  the European Union along with rustronomy.  If not, see
  <https://ec.europa.eu/info/european-union-public-licence_en/>.

  (1) Resident of the Kingdom of the Netherlands; agreement between licensor and
  licensee subject to Dutch law as per article 15 of the EUPL.
*/

//! Walking the 8-neighbourhood of a pixel.
//!
//! Pixels are addressed by their `(row, col)` index into an `ndarray::Array2`
//! of shape `dim = (height, width)`. Directions are numbered clockwise,
//! starting straight up:
//! ```text
//!   7 0 1
//!   6 . 2
//!   5 4 3
//! ```
//! Direction `d` and direction `(d + 4) % 8` always point in opposite ways.

pub(crate) const DIR_X_OFFSET: [isize; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
pub(crate) const DIR_Y_OFFSET: [isize; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

/// True for pixels in the outermost row or column
#[inline]
pub(crate) fn is_border(dim: (usize, usize), (y, x): (usize, usize)) -> bool {
  y == 0 || x == 0 || y + 1 == dim.0 || x + 1 == dim.1
}

/// True if the neighbour of `index` in direction `d` lies inside the array
#[inline]
pub(crate) fn is_within(dim: (usize, usize), (y, x): (usize, usize), d: usize) -> bool {
  let (ymax, xmax) = (dim.0 - 1, dim.1 - 1);
  match d {
    0 => y > 0,
    1 => x < xmax && y > 0,
    2 => x < xmax,
    3 => x < xmax && y < ymax,
    4 => y < ymax,
    5 => x > 0 && y < ymax,
    6 => x > 0,
    7 => x > 0 && y > 0,
    _ => false,
  }
}

/// Index of the neighbour of `index` in direction `d`. The caller must make
/// sure that this neighbour exists (see `is_within`).
#[inline]
pub(crate) fn neighbour((y, x): (usize, usize), d: usize) -> (usize, usize) {
  (y.wrapping_add_signed(DIR_Y_OFFSET[d]), x.wrapping_add_signed(DIR_X_OFFSET[d]))
}

/// All neighbours of `index` that lie inside the array, with their direction
#[inline]
pub(crate) fn neighbours_8con(
  dim: (usize, usize),
  index: (usize, usize),
) -> impl Iterator<Item = (usize, (usize, usize))> {
  (0..8).filter(move |&d| is_within(dim, index, d)).map(move |d| (d, neighbour(index, d)))
}
