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

//! Finding and analysing the local maxima of a distance field.
//!
//! Candidates are found with a plain 8-neighbour test and sorted by a quantised
//! height. The analysis then walks them from highest to lowest and grows the
//! region of near-equal height around each one. A candidate whose region runs
//! into a higher pixel or into the region of an earlier maximum is not a true
//! maximum.

use crate::edm::DistanceField;
use crate::neighbours::{neighbour, neighbours_8con};
use ndarray as nd;
use std::f32::consts::SQRT_2;
use std::ops::BitOr;

/// Heights may be misordered by the quantised sort key by up to this much
const MAX_SORTING_ERROR: f32 = 1.1 * SQRT_2 / 2.0;

/// Quantised heights span `[0, HEIGHT_SCALE]` for pixels up to the global
/// maximum. True heights can exceed it by up to `√2/2`.
const HEIGHT_SCALE: f64 = 2e9;

/// Per-pixel state of the maxima finder and analyser.
///
/// | bit        | set by    | meaning                                              |
/// |------------|-----------|------------------------------------------------------|
/// | `MAXIMUM`  | finder    | pixel is a maximum candidate                         |
/// | `LISTED`   | analyser  | pixel is in the region currently being grown         |
/// | `PROCESSED`| analyser  | pixel belongs to the region of an analysed maximum   |
/// | `MAX_AREA` | analyser  | pixel belongs to the region of a *true* maximum      |
/// | `EQUAL`    | analyser  | pixel has exactly the height of its maximum          |
/// | `MAX_POINT`| analyser  | pixel is the single representative of its maximum    |
///
/// `LISTED` is cleared again before the analyser moves on to the next maximum.
/// After the analysis only `MAX_AREA` and `MAX_POINT` carry meaning for later
/// stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MaxFlags(u8);

impl MaxFlags {
  pub const NONE: Self = MaxFlags(0);
  pub const MAXIMUM: Self = MaxFlags(1);
  pub const LISTED: Self = MaxFlags(2);
  pub const PROCESSED: Self = MaxFlags(4);
  pub const MAX_AREA: Self = MaxFlags(8);
  pub const EQUAL: Self = MaxFlags(16);
  pub const MAX_POINT: Self = MaxFlags(32);

  #[inline(always)]
  pub fn contains(self, other: Self) -> bool {
    self.0 & other.0 == other.0
  }

  #[inline(always)]
  pub fn insert(&mut self, other: Self) {
    self.0 |= other.0;
  }

  #[inline(always)]
  pub fn remove(&mut self, other: Self) {
    self.0 &= !other.0;
  }
}

impl BitOr for MaxFlags {
  type Output = Self;

  fn bitor(self, rhs: Self) -> Self {
    MaxFlags(self.0 | rhs.0)
  }
}

/// A maximum candidate: quantised height first, `(row, col)` index as
/// tie-break (the same order as the flat offset `x + y*width`). Sorting a list
/// of these ascending puts the highest maxima at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MaximaPoint {
  pub height: i64,
  pub index: (usize, usize),
}

/// Output of the maxima finder: the candidates, sorted, and a flag array with
/// `MAXIMUM` set at each of them.
#[derive(Debug, Clone)]
pub(crate) struct MaximaCandidates {
  pub points: Vec<MaximaPoint>,
  pub flags: nd::Array2<MaxFlags>,
}

/// Output of the maxima analysis.
#[derive(Debug, Clone)]
pub(crate) struct MaximaAnalysis {
  /// All candidates, sorted ascending
  pub points: Vec<MaximaPoint>,
  /// `MAX_AREA`/`MAX_POINT` regions of the true maxima
  pub regions: nd::Array2<MaxFlags>,
  /// `(row, col)` of the representative point of each true maximum, highest
  /// first
  pub representatives: Vec<(usize, usize)>,
  /// How often growing a region had to restart from a higher pixel
  pub sorting_errors: usize,
}

/// Finds all interior local maxima of the distance field.
///
/// A foreground pixel is a candidate unless one of its 8 neighbours is higher
/// both in raw value *and* in true height. Border pixels and pixels at the
/// global minimum are never candidates.
pub(crate) fn find_candidates(edm: &DistanceField) -> MaximaCandidates {
  let field = edm.field();
  let (height, width) = field.dim();
  let (global_min, global_max) = (edm.min(), edm.max());
  let mut flags = nd::Array2::from_elem(field.dim(), MaxFlags::NONE);

  let mut indices = Vec::new();
  for y in 1..height.saturating_sub(1) {
    for x in 1..width.saturating_sub(1) {
      let index = (y, x);
      let v = field[index];
      if v == global_min {
        continue;
      }
      let v_true = edm.true_height(index);
      let is_max = (0..8).all(|d| {
        let index2 = neighbour(index, d);
        !(field[index2] > v && edm.true_height(index2) > v_true)
      });
      if is_max {
        flags[index] = MaxFlags::MAXIMUM;
        indices.push(index);
      }
    }
  }

  //Quantise the true heights so that they sort like integers
  let span = (global_max - global_min) as f64;
  let factor = if span > 0.0 { HEIGHT_SCALE / span } else { 0.0 };
  let mut points: Vec<MaximaPoint> = indices
    .into_iter()
    .map(|index| MaximaPoint {
      height: ((edm.true_height(index) - global_min) as f64 * factor) as i64,
      index,
    })
    .collect();
  points.sort();

  log::debug!("found {} maximum candidates", points.len());
  MaximaCandidates { points, flags }
}

/// Grows the region of each candidate (highest first) and decides whether it
/// is a true maximum.
///
/// Growth runs over 8-connected foreground pixels whose true height lies
/// within `tolerance` below the seed. Reaching a pixel that is higher than the
/// seed by more than the sorting error, or that belongs to an earlier region,
/// makes the candidate a false maximum. Reaching a pixel only slightly higher
/// than the seed means the sort order was wrong: the grown region is discarded
/// and growth restarts from that pixel.
pub(crate) fn analyse_maxima(
  edm: &DistanceField,
  candidates: MaximaCandidates,
  tolerance: f32,
) -> MaximaAnalysis {
  let MaximaCandidates { points, mut flags } = candidates;
  let field = edm.field();
  let dim = field.dim();

  let mut list: Vec<(usize, usize)> = Vec::with_capacity(field.len());
  let mut representatives = Vec::new();
  let mut sorting_errors = 0;

  for point in points.iter().rev() {
    let mut index0 = point.index;
    if flags[index0].contains(MaxFlags::PROCESSED) {
      continue;
    }
    let mut v0 = edm.true_height(index0);

    loop {
      //(1) start a new region at the (current) seed
      list.clear();
      list.push(index0);
      flags[index0].insert(MaxFlags::EQUAL | MaxFlags::LISTED);
      let (y0, x0) = index0;
      let mut sorting_error = false;
      let mut max_possible = true;
      let (mut x_equal, mut y_equal) = (x0 as f64, y0 as f64);
      let mut n_equal = 1usize;

      //(2) grow it; the list grows while we walk it
      let mut list_i = 0;
      while list_i < list.len() {
        let index = list[list_i];
        for (_, index2) in neighbours_8con(dim, index) {
          if flags[index2].contains(MaxFlags::LISTED) || field[index2] <= 0.0 {
            continue;
          }
          if flags[index2].contains(MaxFlags::PROCESSED) {
            //ran into the region of an earlier maximum
            max_possible = false;
            break;
          }
          let v2 = edm.true_height(index2);
          if v2 > v0 + MAX_SORTING_ERROR {
            //ran into a higher point
            max_possible = false;
            break;
          } else if v2 >= v0 - tolerance {
            if v2 > v0 {
              //this point should have been analysed before the seed
              sorting_error = true;
              index0 = index2;
              v0 = v2;
            }
            list.push(index2);
            flags[index2].insert(MaxFlags::LISTED);
            if v2 == v0 {
              let (y2, x2) = index2;
              flags[index2].insert(MaxFlags::EQUAL);
              x_equal += x2 as f64;
              y_equal += y2 as f64;
              n_equal += 1;
            }
          }
        }
        list_i += 1;
      }

      //(3) sorting error: forget everything and restart from the higher pixel
      if sorting_error {
        sorting_errors += 1;
        list.iter().for_each(|&index| flags[index] = MaxFlags::NONE);
        continue;
      }

      //(4) resolve: mark the region and pick its representative point
      x_equal /= n_equal as f64;
      y_equal /= n_equal as f64;
      let mut min_dist2 = f64::INFINITY;
      let mut nearest = 0;
      for (list_i, &index) in list.iter().enumerate() {
        let px = &mut flags[index];
        px.remove(MaxFlags::LISTED);
        if !max_possible {
          px.remove(MaxFlags::EQUAL);
        }
        px.insert(MaxFlags::PROCESSED);
        if max_possible {
          px.insert(MaxFlags::MAX_AREA);
          if px.contains(MaxFlags::EQUAL) {
            let (y, x) = index;
            let dist2 = (x_equal - x as f64).powi(2) + (y_equal - y as f64).powi(2);
            if dist2 < min_dist2 {
              min_dist2 = dist2;
              nearest = list_i;
            }
          }
        }
      }
      if max_possible {
        flags[list[nearest]].insert(MaxFlags::MAX_POINT);
        representatives.push(list[nearest]);
      }
      break;
    }
  }

  log::debug!(
    "{} of {} candidates are true maxima ({} sorting errors corrected)",
    representatives.len(),
    points.len(),
    sorting_errors
  );
  MaximaAnalysis { points, regions: flags, representatives, sorting_errors }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edm::{distance_field, DistanceMetric};

  fn disc(width: usize, height: usize, discs: &[(f64, f64, f64)]) -> nd::Array2<u8> {
    nd::Array2::from_shape_fn((height, width), |(y, x)| {
      let edge = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
      let inside =
        discs.iter().any(|&(cx, cy, r)| (x as f64 - cx).powi(2) + (y as f64 - cy).powi(2) <= r * r);
      if inside && !edge {
        255
      } else {
        0
      }
    })
  }

  fn framed_square(size: usize) -> nd::Array2<u8> {
    let mut img = nd::Array2::zeros((size, size));
    img.slice_mut(nd::s![1..size - 1, 1..size - 1]).fill(255);
    img
  }

  #[test]
  fn flags_do_not_collide() {
    let all = [
      MaxFlags::MAXIMUM,
      MaxFlags::LISTED,
      MaxFlags::PROCESSED,
      MaxFlags::MAX_AREA,
      MaxFlags::EQUAL,
      MaxFlags::MAX_POINT,
    ];
    for (i, a) in all.iter().enumerate() {
      for b in &all[i + 1..] {
        assert!(!a.contains(*b));
      }
    }
    let mut f = MaxFlags::LISTED | MaxFlags::EQUAL;
    f.remove(MaxFlags::LISTED);
    assert_eq!(f, MaxFlags::EQUAL);
  }

  #[test]
  fn points_sort_by_height_then_scan_order() {
    let mut points = vec![
      MaximaPoint { height: 5, index: (0, 1) },
      MaximaPoint { height: 2, index: (3, 0) },
      MaximaPoint { height: 5, index: (0, 0) },
    ];
    points.sort();
    let indices: Vec<(usize, usize)> = points.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![(3, 0), (0, 0), (0, 1)]);
  }

  #[test]
  fn square_has_single_central_maximum() {
    let edm = distance_field(framed_square(7).view(), &DistanceMetric::Chessboard.mask());
    let candidates = find_candidates(&edm);
    assert_eq!(candidates.points.len(), 1);
    assert_eq!(candidates.points[0].index, (3, 3));

    let analysis = analyse_maxima(&edm, candidates, 0.5);
    assert_eq!(analysis.representatives, vec![(3, 3)]);
    assert_eq!(analysis.sorting_errors, 0);
    assert!(analysis.regions[[3, 3]].contains(MaxFlags::MAX_AREA | MaxFlags::MAX_POINT));
    assert!(!analysis.regions[[3, 2]].contains(MaxFlags::MAX_AREA));
  }

  #[test]
  fn plateau_is_one_maximum() {
    //an even-sized square has a 2x2 plateau of equal distances
    let edm = distance_field(framed_square(10).view(), &DistanceMetric::Euclidean.mask());
    let candidates = find_candidates(&edm);
    assert_eq!(candidates.points.len(), 4);

    let analysis = analyse_maxima(&edm, candidates, 0.5);
    assert_eq!(analysis.representatives.len(), 1);
    let plateau = [(4, 4), (4, 5), (5, 4), (5, 5)];
    for index in plateau {
      assert!(analysis.regions[index].contains(MaxFlags::MAX_AREA));
    }
    assert!(plateau.contains(&analysis.representatives[0]));
  }

  #[test]
  fn heights_above_the_global_maximum_keep_their_order() {
    //a 3x5 block of ones: the middle row has a true height of 1 + √2/2, well
    //above the global maximum of 1
    let mut field = nd::Array2::<f32>::zeros((5, 7));
    field.slice_mut(nd::s![1..4, 1..6]).fill(1.0);
    let edm = DistanceField::from_field(field);
    let candidates = find_candidates(&edm);
    assert_eq!(candidates.points.len(), 15);

    let true_heights: Vec<f32> = candidates.points.iter().map(|p| edm.true_height(p.index)).collect();
    assert!(true_heights.windows(2).all(|w| w[0] <= w[1]), "{true_heights:?}");
    let top: Vec<(usize, usize)> = candidates.points[12..].iter().map(|p| p.index).collect();
    assert_eq!(top, vec![(2, 2), (2, 3), (2, 4)]);
  }

  #[test]
  fn sorting_error_restarts_from_the_higher_pixel() {
    //the centre is the only candidate, but its true height (1.0) is below the
    //raw height of the border pixel to its right (1.5)
    let edm = DistanceField::from_field(nd::arr2(&[
      [0.0f32, 0.0, 0.0],
      [0.0, 2.0, 1.5],
      [0.0, 0.0, 0.0],
    ]));
    let candidates = find_candidates(&edm);
    assert_eq!(candidates.points.iter().map(|p| p.index).collect::<Vec<_>>(), vec![(1, 1)]);

    let analysis = analyse_maxima(&edm, candidates, 1.0);
    assert_eq!(analysis.sorting_errors, 1);
    assert_eq!(analysis.representatives, vec![(1, 2)]);
    assert!(analysis.regions[[1, 2]].contains(MaxFlags::MAX_AREA | MaxFlags::MAX_POINT));
    assert!(analysis.regions[[1, 1]].contains(MaxFlags::MAX_AREA));
    assert!(!analysis.regions[[1, 1]].contains(MaxFlags::MAX_POINT));
    assert!(analysis.regions.iter().all(|f| !f.contains(MaxFlags::LISTED)));
  }

  #[test]
  fn background_has_no_candidates() {
    let img = nd::Array2::<u8>::zeros((8, 8));
    let edm = distance_field(img.view(), &DistanceMetric::Euclidean.mask());
    let candidates = find_candidates(&edm);
    assert!(candidates.points.is_empty());
    let analysis = analyse_maxima(&edm, candidates, 0.5);
    assert!(analysis.representatives.is_empty());
  }

  #[test]
  fn separate_discs_each_keep_their_maximum() {
    let img = disc(40, 20, &[(9.0, 9.5, 6.0), (29.0, 9.5, 4.0)]);
    let edm = distance_field(img.view(), &DistanceMetric::Euclidean.mask());
    let analysis = analyse_maxima(&edm, find_candidates(&edm), 0.5);
    let mut sides: Vec<bool> = analysis.representatives.iter().map(|&(_, x)| x < 20).collect();
    sides.sort();
    sides.dedup();
    assert_eq!(sides, vec![false, true]);
  }

  #[test]
  fn huge_tolerance_merges_connected_object() {
    let img = disc(50, 30, &[(15.0, 15.0, 9.0), (32.0, 15.0, 9.0)]);
    let edm = distance_field(img.view(), &DistanceMetric::Euclidean.mask());
    let analysis = analyse_maxima(&edm, find_candidates(&edm), 100.0);
    assert_eq!(analysis.representatives.len(), 1);
  }
}
