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

//! Chamfer distance transform of binary images (the "EDM" the watershed floods).

use crate::error::{WatershedError, WatershedResult};
use crate::neighbours::{is_border, neighbour};
use ndarray as nd;
use std::f32::consts::SQRT_2;

/// 3×3 neighbour weights for a chamfer distance transform. `weights[dy + 1][dx + 1]`
/// is the cost of a step by `(dx, dy)`; the centre weight is always zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChamferMask {
  weights: [[f32; 3]; 3],
}

impl ChamferMask {
  /// Builds a mask from user-supplied weights. The centre must be zero and all
  /// eight neighbour weights must be finite and at least one (a single pixel
  /// step).
  pub fn new(weights: [[f32; 3]; 3]) -> WatershedResult<Self> {
    if weights[1][1] != 0.0 {
      return Err(WatershedError::InvalidMask(format!(
        "centre weight must be 0, found {}",
        weights[1][1]
      )));
    }
    for (dy, row) in weights.iter().enumerate() {
      for (dx, &w) in row.iter().enumerate() {
        if (dx, dy) != (1, 1) && !(w.is_finite() && w >= 1.0) {
          return Err(WatershedError::InvalidMask(format!(
            "weight at ({dx}, {dy}) must be finite and >= 1, found {w}"
          )));
        }
      }
    }
    Ok(ChamferMask { weights })
  }

  const fn symmetric(orthogonal: f32, diagonal: f32) -> Self {
    ChamferMask {
      weights: [
        [diagonal, orthogonal, diagonal],
        [orthogonal, 0.0, orthogonal],
        [diagonal, orthogonal, diagonal],
      ],
    }
  }

  /// Cost of a step by `(dx, dy)`, with `dx, dy ∈ {-1, 0, 1}`
  #[inline(always)]
  pub fn weight(&self, dx: isize, dy: isize) -> f32 {
    self.weights[(dy + 1) as usize][(dx + 1) as usize]
  }

  pub fn weights(&self) -> [[f32; 3]; 3] {
    self.weights
  }
}

/// The local metrics the distance transform ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
  /// Every one of the 8 steps costs 1
  Chessboard,
  /// Orthogonal steps cost 1, diagonal steps cost 2
  Manhattan,
  /// Orthogonal steps cost 1, diagonal steps cost √2
  #[default]
  Euclidean,
}

impl DistanceMetric {
  pub const fn mask(self) -> ChamferMask {
    match self {
      DistanceMetric::Chessboard => ChamferMask::symmetric(1.0, 1.0),
      DistanceMetric::Manhattan => ChamferMask::symmetric(1.0, 2.0),
      DistanceMetric::Euclidean => ChamferMask::symmetric(1.0, SQRT_2),
    }
  }
}

impl From<DistanceMetric> for ChamferMask {
  fn from(metric: DistanceMetric) -> Self {
    metric.mask()
  }
}

/// Per-pixel distance to the nearest background pixel.
///
/// Background pixels hold `0.0`. The field is read-only once computed: later
/// stages only derive "true heights" from it.
#[derive(Debug, Clone)]
pub struct DistanceField {
  field: nd::Array2<f32>,
  min: f32,
  max: f32,
}

impl DistanceField {
  /// Wraps an array of distances and records its extremes
  pub(crate) fn from_field(field: nd::Array2<f32>) -> Self {
    if field.is_empty() {
      return DistanceField { field, min: 0.0, max: 0.0 };
    }
    let (min, max) = field
      .iter()
      .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| (min.min(v), max.max(v)));
    DistanceField { field, min, max }
  }

  pub fn field(&self) -> nd::ArrayView2<'_, f32> {
    self.field.view()
  }

  /// Largest distance in the field (`0.0` for an image without objects)
  pub fn max(&self) -> f32 {
    self.max
  }

  /// Smallest distance in the field
  pub fn min(&self) -> f32 {
    self.min
  }

  pub fn into_array(self) -> nd::Array2<f32> {
    self.field
  }

  /// Sub-pixel corrected height of the pixel at `index`.
  ///
  /// For every axis through the pixel (horizontal, vertical and both diagonals)
  /// the height is estimated from the two opposite neighbours: their mean if the
  /// pixel sits on a ridge along that axis, otherwise the lower one, plus the
  /// step length. The smallest estimate wins, capped at `value + √2/2`. If the
  /// pixel is not on a ridge along any axis, the raw value is returned. Border
  /// and background pixels also keep their raw value.
  pub fn true_height(&self, index: (usize, usize)) -> f32 {
    let v = self.field[index];
    if is_border(self.field.dim(), index) || v == 0.0 {
      return v;
    }

    let mut true_h = v + 0.5 * SQRT_2;
    let mut ridge_or_max = false;
    for d in 0..4 {
      let v1 = self.field[neighbour(index, d)];
      let v2 = self.field[neighbour(index, d + 4)];
      let mut h = if v >= v1 && v >= v2 {
        ridge_or_max = true;
        (v1 + v2) / 2.0
      } else {
        v1.min(v2)
      };
      h += if d % 2 == 0 { 1.0 } else { SQRT_2 };
      if true_h > h {
        true_h = h;
      }
    }

    if ridge_or_max {
      true_h
    } else {
      v
    }
  }
}

/// Chamfer distance transform of a binary image.
///
/// Zero pixels are background, everything else is foreground. Background
/// starts at `0`, foreground at `+∞`. A forward raster scan pulls distances in
/// from the already visited upper/left neighbours, a backward scan from the
/// lower/right ones. The outermost rows and columns are never updated, so
/// foreground pixels there (and anything the scans could not reach) end up
/// reset to `0`.
pub fn distance_field(image: nd::ArrayView2<u8>, mask: &ChamferMask) -> DistanceField {
  let (height, width) = image.dim();
  let mut d = image.mapv(|px| if px == 0 { 0.0f32 } else { f32::INFINITY });

  //(1) forward pass: top-to-bottom, left-to-right
  for y in 1..height.saturating_sub(1) {
    for x in 1..width.saturating_sub(1) {
      let mut best = d[[y, x]];
      best = best.min(mask.weight(-1, 0) + d[[y, x - 1]]);
      best = best.min(mask.weight(-1, -1) + d[[y - 1, x - 1]]);
      best = best.min(mask.weight(0, -1) + d[[y - 1, x]]);
      best = best.min(mask.weight(1, -1) + d[[y - 1, x + 1]]);
      d[[y, x]] = best;
    }
  }

  //(2) backward pass: bottom-to-top, right-to-left
  for y in (1..height.saturating_sub(1)).rev() {
    for x in (1..width.saturating_sub(1)).rev() {
      let mut best = d[[y, x]];
      best = best.min(mask.weight(1, 0) + d[[y, x + 1]]);
      best = best.min(mask.weight(1, 1) + d[[y + 1, x + 1]]);
      best = best.min(mask.weight(0, 1) + d[[y + 1, x]]);
      best = best.min(mask.weight(-1, 1) + d[[y + 1, x - 1]]);
      d[[y, x]] = best;
    }
  }

  //(3) unreachable pixels are not part of any object
  d.mapv_inplace(|px| if px.is_infinite() { 0.0 } else { px });
  let edm = DistanceField::from_field(d);

  log::debug!("distance field {width}x{height}: min {}, max {}", edm.min(), edm.max());
  edm
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn framed(width: usize, height: usize) -> nd::Array2<u8> {
    let mut img = nd::Array2::zeros((height, width));
    img.slice_mut(nd::s![1..height - 1, 1..width - 1]).fill(255);
    img
  }

  #[test]
  fn background_only_gives_zero_field() {
    let img = nd::Array2::<u8>::zeros((6, 9));
    let edm = distance_field(img.view(), &DistanceMetric::Euclidean.mask());
    assert_eq!(edm.max(), 0.0);
    assert!(edm.field().iter().all(|&v| v == 0.0));
  }

  #[test]
  fn foreground_without_background_is_reset() {
    let img = nd::Array2::from_elem((5, 5), 255u8);
    let edm = distance_field(img.view(), &DistanceMetric::Chessboard.mask());
    assert_eq!(edm.max(), 0.0);
  }

  #[test]
  fn single_pixel_is_one_step_away() {
    for metric in [DistanceMetric::Chessboard, DistanceMetric::Manhattan, DistanceMetric::Euclidean] {
      let mut img = nd::Array2::<u8>::zeros((5, 5));
      img[[2, 2]] = 255;
      let edm = distance_field(img.view(), &metric.mask());
      assert_eq!(edm.field()[[2, 2]], 1.0, "{metric:?}");
      assert_eq!(edm.max(), 1.0);
    }
  }

  #[test]
  fn framed_square_peaks_in_the_centre() {
    let edm = distance_field(framed(7, 7).view(), &DistanceMetric::Chessboard.mask());
    let field = edm.field();
    assert_eq!(edm.max(), 3.0);
    assert_eq!(field[[3, 3]], 3.0);
    assert_eq!(field[[3, 2]], 2.0);
    assert_eq!(field[[1, 1]], 1.0);
    //values never increase when walking from the centre to the frame
    for x in 3..6 {
      assert!(field[[3, x]] >= field[[3, x + 1]]);
    }
  }

  #[test]
  fn transposed_input_gives_transposed_field() {
    let img = framed(9, 5);
    let mask = DistanceMetric::Euclidean.mask();
    let edm = distance_field(img.view(), &mask);
    let edm_t = distance_field(img.t(), &mask);
    assert_eq!(edm_t.into_array(), edm.into_array().reversed_axes());
  }

  #[test]
  fn object_touching_the_image_edge_is_not_closed_by_it() {
    //the left column is foreground, but it is never updated by the scans
    let mut img = framed(6, 5);
    img.slice_mut(nd::s![1..4, 0]).fill(255);
    let edm = distance_field(img.view(), &DistanceMetric::Chessboard.mask());
    assert_eq!(edm.field()[[2, 0]], 0.0);
    //the closest background is two rows up or down, not the column to the left
    assert_eq!(edm.field()[[2, 1]], 2.0);
  }

  #[test]
  fn true_height_of_isolated_peak() {
    let edm = distance_field(framed(7, 7).view(), &DistanceMetric::Chessboard.mask());
    //vertical neighbours are both 2: (2 + 2)/2 + 1
    assert_eq!(edm.true_height((3, 3)), 3.0);
    //a flank pixel is a ridge along its own row only
    assert_eq!(edm.true_height((2, 3)), 2.0);
    //border and background keep their raw value
    assert_eq!(edm.true_height((0, 0)), 0.0);
  }

  #[test]
  fn field_extremes() {
    let edm = DistanceField::from_field(nd::arr2(&[[0.5f32, 3.0], [2.0, 1.0]]));
    assert_eq!((edm.min(), edm.max()), (0.5, 3.0));
  }

  #[test]
  fn mask_validation() {
    assert!(ChamferMask::new([[3.0, 2.0, 3.0], [2.0, 0.0, 2.0], [3.0, 2.0, 3.0]]).is_ok());
    assert!(ChamferMask::new([[1.0; 3]; 3]).is_err());
    assert!(ChamferMask::new([[1.0, 0.5, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]).is_err());
    assert!(ChamferMask::new([[1.0, f32::NAN, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]).is_err());
  }

  fn arb_metric() -> impl Strategy<Value = DistanceMetric> {
    prop_oneof![
      Just(DistanceMetric::Chessboard),
      Just(DistanceMetric::Manhattan),
      Just(DistanceMetric::Euclidean),
    ]
  }

  proptest! {
    #[test]
    fn rectangle_distances_are_exact(
      metric in arb_metric(),
      x0 in 1usize..10,
      y0 in 1usize..10,
      w in 1usize..12,
      h in 1usize..12,
    ) {
      //rectangle [x0, x1] x [y0, y1] with at least one pixel of background around it
      let (x1, y1) = (x0 + w - 1, y0 + h - 1);
      let mut img = nd::Array2::<u8>::zeros((y1 + 2, x1 + 3));
      img.slice_mut(nd::s![y0..=y1, x0..=x1]).fill(1);
      let edm = distance_field(img.view(), &metric.mask());
      for y in y0..=y1 {
        for x in x0..=x1 {
          let expected = (x - x0 + 1).min(x1 - x + 1).min(y - y0 + 1).min(y1 - y + 1);
          prop_assert_eq!(edm.field()[[y, x]], expected as f32);
        }
      }
      prop_assert_eq!(edm.field()[[0, 0]], 0.0);
    }
  }
}
