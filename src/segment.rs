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

//! From analysed maxima to a segmented 8-bit image.
//!
//! The working image uses three kinds of values:
//! - `0`: background, never flooded
//! - `1..=254`: levels that still have to be flooded
//! - `255`: flooded, i.e. part of a catchment basin

use crate::edm::DistanceField;
use crate::maxima::{MaxFlags, MaximaPoint};
use crate::neighbours::{is_border, neighbours_8con};
use ndarray as nd;

////////////////////////////////////////////////////////////////////////////////
//                                 CONSTANTS                                  //
////////////////////////////////////////////////////////////////////////////////

pub(crate) const BACKGROUND: u8 = u8::MIN;
pub(crate) const FLOODED: u8 = u8::MAX;
const HIGHEST_LEVEL: u8 = u8::MAX - 1;

/// Distances below this are background in the working image
const QUANTISE_THRESHOLD: f32 = 0.5;
/// Distance that maps to the lowest level
const QUANTISE_MIN_VALUE: f64 = 1.0;

/// Dilation passes of a level run in this order: diagonal directions first
pub(crate) const DIRECTION_SEQUENCE: [usize; 8] = [7, 3, 1, 5, 0, 4, 2, 6];
const MAX_IDLE_PASSES: usize = 8;

////////////////////////////////////////////////////////////////////////////////
//                                 QUANTISER                                  //
////////////////////////////////////////////////////////////////////////////////

/// Rescales the distance field into the 8-bit working image.
///
/// True-maximum regions become `255`, distances below `0.5` become `0`, and
/// everything else maps monotonically onto `1..=254`. Distances are never
/// stretched: one level never spans less than one unit of distance.
pub(crate) fn make_8bit(edm: &DistanceField, regions: &nd::Array2<MaxFlags>) -> nd::Array2<u8> {
  let span = edm.max() as f64 - QUANTISE_MIN_VALUE;
  let (offset, factor) = if span > 0.0 {
    (QUANTISE_MIN_VALUE - span * (1.0 / 253.0 / 2.0 - 1e-6), (253.0 / span).min(1.0))
  } else {
    (QUANTISE_MIN_VALUE, 1.0)
  };

  nd::Zip::from(edm.field()).and(regions).map_collect(|&raw, flags| {
    if raw < QUANTISE_THRESHOLD {
      BACKGROUND
    } else if flags.contains(MaxFlags::MAX_AREA) {
      FLOODED
    } else {
      let v = 1.0 + ((raw as f64 - offset) * factor).round();
      v.clamp(1.0, HIGHEST_LEVEL as f64) as u8
    }
  })
}

////////////////////////////////////////////////////////////////////////////////
//                              MAXIMA CLEANUP                                //
////////////////////////////////////////////////////////////////////////////////

/// Per-pixel state of the cleanup pass. `MAX_AREA` is copied from the maxima
/// analysis, `LISTED` only lives while one maximum is processed, `ELIMINATED`
/// marks area that was flattened to the level of its saddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SaddleFlags(u8);

impl SaddleFlags {
  const NONE: Self = SaddleFlags(0);
  const LISTED: Self = SaddleFlags(1);
  const MAX_AREA: Self = SaddleFlags(2);
  const ELIMINATED: Self = SaddleFlags(4);

  #[inline(always)]
  fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }

  #[inline(always)]
  fn insert(&mut self, other: Self) {
    self.0 |= other.0;
  }

  #[inline(always)]
  fn remove(&mut self, other: Self) {
    self.0 &= !other.0;
  }
}

/// Flattens the maxima that did not survive the analysis.
///
/// Each such maximum (highest first) floods downwards one level at a time until
/// the flood touches a true-maximum region, or an already flattened pixel that
/// is not below the current level. That level is the saddle: everything found
/// *above* it is lowered to the saddle level and marked as eliminated, so the
/// watershed cannot start a separate basin there.
///
/// Returns the number of flattened pixels.
pub(crate) fn cleanup_maxima(
  image: &mut nd::Array2<u8>,
  regions: &nd::Array2<MaxFlags>,
  points: &[MaximaPoint],
) -> usize {
  let mut flags = regions.mapv(|f| {
    if f.contains(MaxFlags::MAX_AREA) {
      SaddleFlags::MAX_AREA
    } else {
      SaddleFlags::NONE
    }
  });
  let dim = image.dim();
  let mut list: Vec<(usize, usize)> = Vec::new();
  let mut eliminated = 0;

  for point in points.iter().rev() {
    let index0 = point.index;
    if flags[index0].contains(SaddleFlags::MAX_AREA)
      || flags[index0].contains(SaddleFlags::ELIMINATED)
    {
      continue;
    }

    let mut lo_level = image[index0] as usize + 1;
    list.clear();
    list.push(index0);
    flags[index0].insert(SaddleFlags::LISTED);
    let mut last_len = 1;
    let mut saddle_found = false;

    while !saddle_found && lo_level > 0 {
      lo_level -= 1;
      //everything listed so far lies above the level we now look at
      last_len = list.len();
      let mut list_i = 0;
      while list_i < list.len() {
        for (_, index2) in neighbours_8con(dim, list[list_i]) {
          let f2 = flags[index2];
          if f2.contains(SaddleFlags::LISTED) {
            continue;
          }
          let v2 = image[index2] as usize;
          if f2.contains(SaddleFlags::MAX_AREA)
            || (f2.contains(SaddleFlags::ELIMINATED) && v2 >= lo_level)
          {
            saddle_found = true;
            break;
          } else if v2 >= lo_level && !f2.contains(SaddleFlags::ELIMINATED) {
            list.push(index2);
            flags[index2].insert(SaddleFlags::LISTED);
          }
        }
        if saddle_found {
          break;
        }
        list_i += 1;
      }
    }

    list.iter().for_each(|&index| flags[index].remove(SaddleFlags::LISTED));
    for &index in &list[..last_len] {
      image[index] = lo_level as u8;
      flags[index].insert(SaddleFlags::ELIMINATED);
    }
    eliminated += last_len;
  }

  log::debug!("maxima cleanup flattened {eliminated} pixels");
  eliminated
}

////////////////////////////////////////////////////////////////////////////////
//                                FATE TABLE                                  //
////////////////////////////////////////////////////////////////////////////////

/// Lookup from an 8-neighbour occupancy pattern to the directions in which a
/// pixel may be flooded.
///
/// Bit `d` of the occupancy pattern is set if the neighbour in direction `d`
/// (0 = up, then clockwise) is already flooded. Bit `d` of the entry is set if
/// the pixel may be flooded by a dilation in direction `d`, which needs the
/// neighbour in direction `(d + 4) % 8` to be flooded.
///
/// When the flooded neighbours do not form one contiguous arc around the pixel,
/// the pixel separates two basins and the entry is zero. For counting the arcs
/// a flooded side neighbour also counts its two adjacent corners as flooded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FateTable([u8; 256]);

/// The fate table used by the watershed flood, computed at compile time
pub const FATE_TABLE: FateTable = FateTable::build();

impl FateTable {
  const fn build() -> Self {
    let mut table = [0u8; 256];
    let mut item = 0;
    while item < 256 {
      let mut is_set = [false; 8];
      let mut i = 0;
      while i < 8 {
        is_set[i] = item & (1 << i) != 0;
        i += 1;
      }

      //dilate in the direction opposite to the flooded neighbours
      let mut entry = 0u8;
      i = 0;
      while i < 8 {
        if is_set[(i + 4) % 8] {
          entry |= 1 << i;
        }
        i += 1;
      }

      //a flooded side neighbour closes the gap to its corners
      i = 0;
      while i < 8 {
        if is_set[i] {
          is_set[(i + 1) % 8] = true;
          is_set[(i + 7) % 8] = true;
        }
        i += 2;
      }

      let mut transitions = 0;
      i = 0;
      while i < 8 {
        if is_set[i] != is_set[(i + 1) % 8] {
          transitions += 1;
        }
        i += 1;
      }

      table[item] = if transitions >= 4 { 0 } else { entry };
      item += 1;
    }
    FateTable(table)
  }

  /// Directions in which a pixel with this occupancy pattern may be flooded
  #[inline(always)]
  pub fn entry(&self, occupancy: u8) -> u8 {
    self.0[occupancy as usize]
  }

  #[inline(always)]
  pub fn permits(&self, occupancy: u8, direction: usize) -> bool {
    self.0[occupancy as usize] & (1 << direction) != 0
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                  FLOODING                                  //
////////////////////////////////////////////////////////////////////////////////

/// What happened to the pixels of one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LevelReport {
  /// pixels set to `255`
  pub flooded: usize,
  /// unflooded pixels handed down to the next level
  pub deferred: usize,
  /// unflooded pixels that are dropped from further processing
  pub unresolved: usize,
}

/// Level-by-level flood of the working image.
///
/// The indices of all pixels at levels `1..=254` are bucket-sorted by level
/// into one array: the pixels at level `v` occupy
/// `coordinates[level_start[v]..level_start[v] + histogram[v]]`. Flooding a
/// level compacts its bucket in place, and unflooded pixels handed down to the
/// next level are appended to that level's bucket.
pub(crate) struct FloodEngine {
  image: nd::Array2<u8>,
  coordinates: Vec<(usize, usize)>,
  level_start: [usize; 256],
  histogram: [usize; 256],
  highest: u8,
  set_list: Vec<(usize, usize)>,
}

impl FloodEngine {
  pub fn new(image: nd::Array2<u8>) -> Self {
    let mut histogram = [0usize; 256];
    image.iter().for_each(|&v| histogram[v as usize] += 1);

    let mut level_start = [0usize; 256];
    let mut offset = 0;
    let mut highest = 0;
    let mut max_bin = 0;
    for v in 1..FLOODED as usize {
      level_start[v] = offset;
      offset += histogram[v];
      if histogram[v] > 0 {
        highest = v as u8;
      }
      max_bin = max_bin.max(histogram[v]);
    }

    //buckets are filled in scan order
    let mut coordinates = vec![(0, 0); offset];
    let mut fill = level_start;
    for (index, &v) in image.indexed_iter() {
      if v != BACKGROUND && v != FLOODED {
        coordinates[fill[v as usize]] = index;
        fill[v as usize] += 1;
      }
    }

    FloodEngine { image, coordinates, level_start, histogram, highest, set_list: Vec::with_capacity(max_bin) }
  }

  /// Highest level that holds any pixels (`0` if there is nothing to flood)
  pub fn highest_level(&self) -> u8 {
    self.highest
  }

  pub fn image(&self) -> &nd::Array2<u8> {
    &self.image
  }

  pub fn into_image(self) -> nd::Array2<u8> {
    self.image
  }

  /// Floods the pixels of `level` from the already flooded pixels around them.
  ///
  /// Dilation passes run in `DIRECTION_SEQUENCE` order, cycling, until the level
  /// is done or eight passes in a row flood nothing. Pixels left over are handed
  /// down to the next non-empty level if they touch the image edge or the
  /// background; others are dropped here.
  pub fn flood_level(&mut self, level: u8) -> LevelReport {
    let level = level as usize;
    let start = self.level_start[level];
    let mut remaining = self.histogram[level];
    let mut report = LevelReport::default();

    //(1) dilate
    let mut idle = 0;
    let mut pass = 0;
    while remaining > 0 && idle < MAX_IDLE_PASSES {
      let n = self.dilate(DIRECTION_SEQUENCE[pass % 8], start, remaining);
      remaining -= n;
      report.flooded += n;
      if n > 0 {
        idle = 0;
      } else {
        idle += 1;
      }
      pass += 1;
    }

    //(2) hand down what is left
    if remaining > 0 && level > 1 {
      let mut next = level - 1;
      while next > 1 && self.histogram[next] == 0 {
        next -= 1;
      }
      //the bucket of `next` ends where the bucket of `level` starts, so we
      //never overwrite a pixel we still have to read
      let mut next_end = self.level_start[next] + self.histogram[next];
      for p in start..start + remaining {
        let index = self.coordinates[p];
        if self.touches_background(index) {
          self.coordinates[next_end] = index;
          next_end += 1;
          report.deferred += 1;
        }
      }
      self.histogram[next] = next_end - self.level_start[next];
    }
    report.unresolved = remaining - report.deferred;

    log::trace!(
      "level {level}: flooded {}, deferred {}, unresolved {}",
      report.flooded,
      report.deferred,
      report.unresolved
    );
    report
  }

  /// One dilation pass in `direction` over the `count` pixels of a bucket.
  /// Pixels are only set to `255` after the whole bucket has been looked at.
  fn dilate(&mut self, direction: usize, start: usize, count: usize) -> usize {
    self.set_list.clear();
    let mut n_unchanged = 0;
    for i in 0..count {
      let index = self.coordinates[start + i];
      if FATE_TABLE.permits(self.occupancy(index), direction) {
        self.set_list.push(index);
      } else {
        self.coordinates[start + n_unchanged] = index;
        n_unchanged += 1;
      }
    }
    for &index in &self.set_list {
      self.image[index] = FLOODED;
    }
    self.set_list.len()
  }

  /// Bit pattern of the flooded neighbours of a pixel
  #[inline]
  fn occupancy(&self, index: (usize, usize)) -> u8 {
    neighbours_8con(self.image.dim(), index)
      .filter(|&(_, index2)| self.image[index2] == FLOODED)
      .fold(0u8, |acc, (d, _)| acc | 1 << d)
  }

  /// True if the pixel lies on the image edge or next to background
  fn touches_background(&self, index: (usize, usize)) -> bool {
    let dim = self.image.dim();
    is_border(dim, index) || neighbours_8con(dim, index).any(|(_, index2)| self.image[index2] == BACKGROUND)
  }
}

////////////////////////////////////////////////////////////////////////////////
//                               POST PROCESSING                              //
////////////////////////////////////////////////////////////////////////////////

/// Binarises a flooded image: `255` stays, everything else becomes `0`.
/// Applying this to an image that only holds `0` and `255` changes nothing.
pub fn post_process(image: &mut nd::Array2<u8>) {
  image.mapv_inplace(|px| if px == FLOODED { FLOODED } else { BACKGROUND });
}
