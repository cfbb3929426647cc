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

//! This module contains all the code required to generate images of the
//! working image during the watershed transform.

use ndarray as nd;
use num_traits::ToPrimitive;
use plotters::prelude::*;
use std::{error::Error, path::Path};

//Colour for background px
const BACKGROUND_COL: RGBColor = BLACK;

/// Signature of the colour maps used to plot the working image
pub type ColourMap = fn(count: u8, min: u8, max: u8) -> Result<RGBColor, Box<dyn Error>>;

/// Writes `slice` to `file_name` as a png with one image pixel per array
/// element. Row `0` of the array is the top row of the image.
pub fn plot_slice<'a, T>(
  slice: nd::ArrayView2<'a, T>,
  file_name: &Path,
  color_map: fn(count: T, min: T, max: T) -> Result<RGBColor, Box<dyn Error>>,
) -> Result<(), Box<dyn Error>>
where
  T: std::fmt::Display + std::cmp::PartialOrd + ToPrimitive + Copy,
{
  let first = *slice.iter().next().ok_or("cannot plot an empty slice")?;
  let min = slice.iter().fold(first, |f, &x| if x < f { x } else { f });
  let max = slice.iter().fold(first, |f, &x| if x > f { x } else { f });

  let (height, width) = slice.dim();
  let root = BitMapBackend::new(file_name, (width as u32, height as u32)).into_drawing_area();
  root.fill(&WHITE)?;

  for ((y, x), px) in slice.indexed_iter() {
    root.draw_pixel((x as i32, y as i32), &color_map(*px, min, max)?)?;
  }
  root.present()?;

  log::debug!("slice saved as png: {file_name:?}; max:{max:2}, min:{min:2}");
  Ok(())
}

/// Linear grey scale between `min` and `max`; values at or below `min` are
/// drawn in black.
#[inline(always)]
pub fn grey_scale<T>(count: T, min: T, max: T) -> Result<RGBColor, Box<dyn Error>>
where
  T: std::fmt::Display + std::cmp::PartialOrd + ToPrimitive,
{
  if count <= min {
    return Ok(BACKGROUND_COL);
  }
  let (count, min, max) = (
    count.to_f64().ok_or("pixel value cannot be plotted")?,
    min.to_f64().ok_or("minimum cannot be plotted")?,
    max.to_f64().ok_or("maximum cannot be plotted")?,
  );
  let gray = (255.0 * (count - min) / (max - min)).clamp(0.0, 255.0) as u8;
  Ok(RGBColor(gray, gray, gray))
}
