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

#![doc(
  html_logo_url = "https://raw.githubusercontent.com/smups/rustronomy/main/logos/Rustronomy_ferris.png?raw=true"
)]
//! Rustronomy-binary-watershed is a pure-rust implementation of the
//! distance-transform based watershed that splits touching objects in a binary
//! image, in the style of the ImageJ "Watershed" command.
//!
//! # Features
//! The transform runs as a fixed pipeline of stages:
//! 1. a two-pass *chamfer distance transform* gives every foreground pixel its
//! distance to the nearest background pixel;
//! 2. the local maxima of that distance field are found, sorted and analysed.
//! Maxima that lie within a `tolerance` of a higher maximum are merged into it;
//! 3. the distance field is quantised to 8 bits, and maxima that only form a
//! small bump on the flank of a stronger maximum are flattened;
//! 4. the regions around the surviving maxima are flooded level by level. A
//! pixel that would join two different basins is never flooded, so it ends up
//! as part of a 1px-wide *watershed line*;
//! 5. the result is binarised: basins are `255`, lines and background `0`.
//!
//! In addition, `rustronomy-binary-watershed` provides extra functionality which
//! can be accessed via cargo feature gates. A list of all additional features
//! [can be found below](#cargo-feature-gates).
//!
//! # Quickstart
//! To use the latest release of rustronomy-binary-watershed in a cargo project,
//! add the rustronomy-binary-watershed crate as a dependency to your
//! `Cargo.toml` file:
//! ```toml
//! [dependencies]
//! rustronomy-binary-watershed = "0.1.0"
//! ```
//!
//! ## Short example: splitting two overlapping discs
//! `rustronomy-binary-watershed` uses the "builder pattern" to configure the
//! transform before executing it. Create a `TransformBuilder`, set the options
//! you need and call `build()` to get a (`Sync`&`Send`) watershed transform
//! object.
//! ```rust
//! use ndarray as nd;
//! use rustronomy_binary_watershed::prelude::*;
//!
//! //Two overlapping discs
//! let img = nd::Array2::from_shape_fn((40, 60), |(y, x)| {
//!   let (x, y) = (x as f64, y as f64);
//!   let left = (x - 20.0).powi(2) + (y - 20.0).powi(2) < 144.0;
//!   let right = (x - 38.0).powi(2) + (y - 20.0).powi(2) < 144.0;
//!   if left || right { 255u8 } else { 0 }
//! });
//!
//! //Set-up the watershed transform
//! let watershed = TransformBuilder::new().set_tolerance(0.5).build().unwrap();
//! //Execute the watershed transform
//! let output = watershed.transform(img.view()).unwrap();
//! println!("found {} objects", watershed.count_regions(output.view()));
//! ```
//!
//! # Cargo feature gates
//! *By default, all features behind cargo feature gates are **disabled***
//! - `jemalloc`: this feature enables the [jemalloc allocator](https://jemalloc.net).
//! Jemalloc is enabled though usage of the `jemallocator` crate, which
//! increases compile times considerably. To compile with the `jemalloc` feature,
//! jemalloc must be installed on the host system.
//! - `plots`: with this feature enabled, the working image is plotted each
//! time a level has been flooded. Plotting support adds the `plotters` crate as
//! a dependency, which increases compile times and requires the installation of
//! some packages on linux systems, [see the `plotters` documentation for details](https://docs.rs/plotters/).
//! - `progress`: this feature enables a progress bar over the flooded levels.
//! Enabling this feature adds the `indicatif` crate as a dependency.
//! - `debug`: this feature enables performance monitoring output for every run
//! of the transform. Enabling this feature does not add additional dependencies.
//!
//! Independent of the feature gates, every stage reports what it did through the
//! [`log`](https://docs.rs/log/) facade at `debug` level, and every flooded level
//! at `trace` level.
//!
//! ## `plots` feature gate
//! Enabling the `plots` feature gate adds two new methods to the `TransformBuilder`
//! struct: `set_plot_colour_map`, which can be used to set the colour map that
//! will be used by `plotters` to generate the images and `set_plot_folder`, which
//! can be used to specify folder where the generated images should be placed. If
//! no output folder is specified when the `plots` feature is enabled, no plots will
//! be generated (code will still compile).
//!
//! The generated plots are png files with no text. Each pixel in the generated
//! images corresponds 1:1 to a pixel in the input array.

//Unconditional imports
use ndarray as nd;
use num_traits::Num;
use std::cmp::Ordering;

mod edm;
mod error;
mod maxima;
mod neighbours;
mod segment;

pub use edm::{ChamferMask, DistanceMetric};
pub use error::{WatershedError, WatershedResult};
pub use segment::{FateTable, FATE_TABLE};

use edm::DistanceField;
use maxima::MaximaAnalysis;
use neighbours::neighbours_8con;

//Set Jemalloc as the global allocator for this crate
#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

//Constants for the values of binary images
const BACKGROUND: u8 = u8::MIN;
const FOREGROUND: u8 = u8::MAX;
const DEFAULT_TOLERANCE: f32 = 0.5;

//Utility prelude for batch import
pub mod prelude {
  pub use crate::{
    BinaryWatershed, ChamferMask, DistanceMetric, TransformBuilder, Watershed, WatershedError,
    WatershedUtils,
  };
  #[cfg(feature = "plots")]
  pub mod color_maps {
    pub use crate::plotting::grey_scale;
  }
}

////////////////////////////////////////////////////////////////////////////////
//                              HELPER FUNCTIONS                              //
////////////////////////////////////////////////////////////////////////////////

#[cfg(feature = "progress")]
fn set_up_bar(levels: u8) -> indicatif::ProgressBar {
  const TEMPLATE: &str = "{spinner}[{elapsed}/{duration}] flooded level {pos}/{len}{bar:60}";
  let bar = indicatif::ProgressBar::new(levels as u64);
  if let Ok(style) = indicatif::ProgressStyle::with_template(TEMPLATE) {
    bar.set_style(style);
  }
  bar
}

/// Checks that the input is a non-empty binary image
fn validate_input(input: nd::ArrayView2<u8>) -> WatershedResult<()> {
  if input.is_empty() {
    return Err(WatershedError::EmptyImage { width: input.ncols(), height: input.nrows() });
  }

  let mut foreground = None;
  for &px in input.iter().filter(|&&px| px != BACKGROUND) {
    match foreground {
      None => foreground = Some(px),
      Some(first) if first != px => return Err(WatershedError::NotBinary { first, second: px }),
      Some(_) => {}
    }
  }
  Ok(())
}

////////////////////////////////////////////////////////////////////////////////
//                             OPTIONAL MODULES                               //
////////////////////////////////////////////////////////////////////////////////
#[cfg(feature = "debug")]
mod performance_monitoring {

  #[derive(Clone, Debug, Default)]
  pub struct PerfReport {
    pub edm_ms: usize,
    pub maxima_ms: usize,
    pub cleanup_ms: usize,
    pub level_mus: Vec<usize>,
    pub flooded: usize,
    pub flattened: usize,
    pub unresolved: usize,
    pub total_ms: usize,
  }

  impl PerfReport {
    pub fn level_avg(&self) -> f64 {
      let num = self.level_mus.len().max(1) as f64;
      self.level_total() / num
    }
    pub fn level_total(&self) -> f64 {
      self.level_mus.iter().map(|&x| x as f64).sum()
    }
  }

  impl std::fmt::Display for PerfReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      writeln!(f, ">---------[Performance Summary]---------")?;
      writeln!(f, ">  Distance transform: {}ms", self.edm_ms)?;
      writeln!(f, ">  Maxima analysis: {}ms", self.maxima_ms)?;
      writeln!(f, ">  Quantising + cleanup: {}ms", self.cleanup_ms)?;
      writeln!(
        f,
        ">  Flooded {} levels; average: {:.1}µs; Σ {:.0}µs",
        self.level_mus.len(),
        self.level_avg(),
        self.level_total()
      )?;
      writeln!(
        f,
        ">  {} px flooded, {} px flattened, {} px unresolved",
        self.flooded, self.flattened, self.unresolved
      )?;
      writeln!(f, ">--------------------------------+ total")?;
      writeln!(
        f,
        ">  {}ms with {:.1}ms overhead (Δt)",
        self.total_ms,
        self.total_ms as f64
          - self.edm_ms as f64
          - self.maxima_ms as f64
          - self.cleanup_ms as f64
          - self.level_total() / 1000.0
      )
    }
  }
}

#[cfg(feature = "plots")]
pub mod plotting;

////////////////////////////////////////////////////////////////////////////////
//                          WATERSHED TRANSFORMS                              //
////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
/// Builder for configuring a watershed transform.
///
/// Use the `new()` associated function to start configuring a transform with
/// the default options (Euclidean distance, tolerance `0.5`). Once you are done,
/// a watershed transform object can be generated with the `build()` associated
/// function. This returns a trait object of the type
/// `Box<dyn Watershed + Send + Sync>`, which can be shared between threads.
///
/// Enabling the `plots` feature gate adds two new methods to the `TransformBuilder`
/// struct: `set_plot_colour_map`, which can be used to set the colour map that
/// will be used by `plotters` to generate the images and `set_plot_folder`, which
/// can be used to specify folder where the generated images should be placed. If
/// no output folder is specified when the `plots` feature is enabled, no plots will
/// be generated (code will still compile).
pub struct TransformBuilder {
  //Plotting options
  #[cfg(feature = "plots")]
  plot_path: Option<std::path::PathBuf>,
  #[cfg(feature = "plots")]
  plot_colour_map: plotting::ColourMap,

  //Basic transform options
  mask: ChamferMask,
  tolerance: f32,
}

impl Default for TransformBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl TransformBuilder {
  /// creates a new `TransformBuilder` with the default options
  pub fn new() -> Self {
    TransformBuilder {
      #[cfg(feature = "plots")]
      plot_path: None,
      #[cfg(feature = "plots")]
      plot_colour_map: plotting::grey_scale, //default map is grey scale
      mask: DistanceMetric::default().mask(),
      tolerance: DEFAULT_TOLERANCE,
    }
  }

  /// Use one of the built-in distance metrics for the distance transform
  pub fn set_metric(mut self, metric: DistanceMetric) -> Self {
    self.mask = metric.mask();
    self
  }

  /// Use a custom chamfer mask for the distance transform
  pub fn set_distance_mask(mut self, mask: ChamferMask) -> Self {
    self.mask = mask;
    self
  }

  /// Set the tolerance (in units of distance) within which a lower maximum is
  /// merged into a higher one. Larger tolerances mean fewer, larger objects.
  pub fn set_tolerance(mut self, tolerance: f32) -> Self {
    self.tolerance = tolerance;
    self
  }

  #[cfg(feature = "plots")]
  /// Set a custom colour map to be used by `plotters` when generating images
  /// of the watershed transform.
  pub fn set_plot_colour_map(mut self, colour_map: plotting::ColourMap) -> Self {
    self.plot_colour_map = colour_map;
    self
  }

  #[cfg(feature = "plots")]
  /// Set output folder for the images generated during the watershed transform.
  /// If no output folder is specified, no images will be generated, even with
  /// the `plots` feature gate enabled.
  pub fn set_plot_folder(mut self, path: &std::path::Path) -> Self {
    self.plot_path = Some(path.to_path_buf());
    self
  }

  /// Build a `Box<dyn Watershed + Send + Sync>` from the current builder
  /// configuration. This function returns an `Err` if the tolerance is negative
  /// or not finite.
  pub fn build(self) -> WatershedResult<Box<dyn Watershed + Send + Sync>> {
    if !self.tolerance.is_finite() || self.tolerance < 0.0 {
      return Err(WatershedError::InvalidTolerance(self.tolerance));
    }

    Ok(Box::new(BinaryWatershed {
      #[cfg(feature = "plots")]
      plot_path: self.plot_path,
      #[cfg(feature = "plots")]
      plot_colour_map: self.plot_colour_map,
      mask: self.mask,
      tolerance: self.tolerance,
    }))
  }
}

/// This trait contains useful functions for preparing the input of a watershed
/// transform and for analysing its output.
pub trait WatershedUtils {
  /// The `binarize` function converts an array of any numeric data-type `T`
  /// into a binary `u8` image: non-zero values become `255`, zero becomes `0`.
  ///
  /// `NaN` compares neither above nor below zero and is mapped to `0`.
  fn binarize<T, D>(&self, img: nd::ArrayView<T, D>) -> nd::Array<u8, D>
  where
    T: Num + Copy + PartialOrd,
    D: nd::Dimension,
  {
    img.mapv(|x| match x.partial_cmp(&T::zero()) {
      Some(Ordering::Greater | Ordering::Less) => FOREGROUND,
      _ => BACKGROUND,
    })
  }

  /// Labels the 8-connected regions of non-zero pixels with `1, 2, ...` in the
  /// order in which they are first met in a row-by-row scan. Zero pixels get
  /// label `0`.
  fn label_regions(&self, img: nd::ArrayView2<u8>) -> nd::Array2<usize> {
    let mut labels = nd::Array2::<usize>::zeros(img.dim());
    let mut stack = Vec::new();
    let mut next_label = 0;

    for (index, &px) in img.indexed_iter() {
      if px == BACKGROUND || labels[index] != 0 {
        continue;
      }
      next_label += 1;
      labels[index] = next_label;
      stack.push(index);

      //depth-first fill of the new region
      while let Some(index) = stack.pop() {
        for (_, index2) in neighbours_8con(img.dim(), index) {
          if img[index2] != BACKGROUND && labels[index2] == 0 {
            labels[index2] = next_label;
            stack.push(index2);
          }
        }
      }
    }

    labels
  }

  /// Returns the number of 8-connected regions of non-zero pixels
  fn count_regions(&self, img: nd::ArrayView2<u8>) -> usize {
    self.label_regions(img).iter().copied().max().unwrap_or(0)
  }
}

/// Actual trait for performing the watershed transform. This trait is dyn-safe,
/// which means that trait objects may be constructed from it.
///
/// All methods accept a binary image: `0` is background and all other pixels
/// must share one foreground value. Arrays have shape `(height, width)`.
pub trait Watershed {
  /// Returns the distance of every pixel to the nearest background pixel.
  fn distance_map(&self, input: nd::ArrayView2<u8>) -> WatershedResult<nd::Array2<f32>>;

  /// Returns the representative point `(row, col)` of every object the
  /// transform will create, highest maximum first.
  fn find_maxima(&self, input: nd::ArrayView2<u8>) -> WatershedResult<Vec<(usize, usize)>>;

  /// Returns watershed transform of input image: `255` for pixels that belong
  /// to an object, `0` for background and for the lines that separate objects.
  fn transform(&self, input: nd::ArrayView2<u8>) -> WatershedResult<nd::Array2<u8>>;

  /// Returns a list of images where each image corresponds to a snapshot of the
  /// working image right after a level has been flooded. Levels are returned
  /// from high to low. The snapshots are not binarised.
  ///
  /// **Caution**: this function has to allocate a full image for every level.
  /// If you just want plots of the intermediate images, consider turning on the
  /// `plots` feature instead.
  fn transform_history(
    &self,
    input: nd::ArrayView2<u8>,
  ) -> WatershedResult<Vec<(u8, nd::Array2<u8>)>>;
}

impl WatershedUtils for dyn Watershed {}
impl WatershedUtils for dyn Watershed + Send + Sync {}

/// Implementation of the distance-transform based binary watershed.
///
/// See crate-level documentation for a general introduction to the algorithm.
///
/// # Memory usage
/// The transform allocates a `f32` distance field, two byte-sized flag arrays,
/// the 8-bit working image and a list of the `(row, col)` indices of all
/// foreground pixels. One can count on the memory usage being about ~25x the
/// size of the input array.
///
/// # Artifacts and peculiarities
/// The distance transform never updates the 1px-wide edges of the input array.
/// They are treated as background, so objects touching the edge of the image
/// lose their outermost row or column of pixels.
pub struct BinaryWatershed {
  //Plot options
  #[cfg(feature = "plots")]
  plot_path: Option<std::path::PathBuf>,
  #[cfg(feature = "plots")]
  plot_colour_map: plotting::ColourMap,
  mask: ChamferMask,
  tolerance: f32,
}

impl BinaryWatershed {
  fn analyse(&self, edm: &DistanceField) -> MaximaAnalysis {
    maxima::analyse_maxima(edm, maxima::find_candidates(edm), self.tolerance)
  }

  #[cfg(feature = "plots")]
  fn plot_level(&self, level: u8, image: &nd::Array2<u8>) {
    if let Some(ref path) = self.plot_path {
      if let Err(err) = plotting::plot_slice(
        image.view(),
        &path.join(format!("ws_lvl{level}.png")),
        self.plot_colour_map,
      ) {
        log::warn!("could not make watershed plot: {err}");
      }
    }
  }

  /// Runs the whole pipeline and returns the binarised result. `on_level` is
  /// called with the working image after each flooded level.
  fn run(
    &self,
    input: nd::ArrayView2<u8>,
    mut on_level: impl FnMut(u8, &nd::Array2<u8>) -> WatershedResult<()>,
  ) -> WatershedResult<nd::Array2<u8>> {
    //(logging) make a new perfreport
    #[cfg(feature = "debug")]
    let mut perf = crate::performance_monitoring::PerfReport::default();
    #[cfg(feature = "debug")]
    let run_start = std::time::Instant::now();

    //(1) distance transform
    validate_input(input)?;
    let edm = edm::distance_field(input, &self.mask);
    #[cfg(feature = "debug")]
    {
      perf.edm_ms = run_start.elapsed().as_millis() as usize;
    }
    if edm.max() <= 0.0 {
      log::debug!("no objects in {}x{} image", input.ncols(), input.nrows());
      return Ok(nd::Array2::from_elem(input.dim(), BACKGROUND));
    }

    //(2) find and analyse the maxima
    #[cfg(feature = "debug")]
    let stage_start = std::time::Instant::now();
    let analysis = self.analyse(&edm);
    #[cfg(feature = "debug")]
    {
      perf.maxima_ms = stage_start.elapsed().as_millis() as usize;
    }

    //(3) quantise, then flatten the maxima that did not make it
    #[cfg(feature = "debug")]
    let stage_start = std::time::Instant::now();
    let mut work = segment::make_8bit(&edm, &analysis.regions);
    let flattened = segment::cleanup_maxima(&mut work, &analysis.regions, &analysis.points);
    #[cfg(feature = "debug")]
    {
      perf.cleanup_ms = stage_start.elapsed().as_millis() as usize;
    }

    //(4) flood level by level, from high to low
    let mut engine = segment::FloodEngine::new(work);
    let highest = engine.highest_level();
    #[cfg(feature = "progress")]
    let bar = set_up_bar(highest);

    let (mut flooded, mut unresolved) = (0, 0);
    for level in (1..=highest).rev() {
      #[cfg(feature = "debug")]
      let level_start = std::time::Instant::now();

      let report = engine.flood_level(level);
      flooded += report.flooded;
      unresolved += report.unresolved;

      #[cfg(feature = "debug")]
      {
        perf.level_mus.push(level_start.elapsed().as_micros() as usize);
      }

      on_level(level, engine.image())?;

      #[cfg(feature = "plots")]
      {
        self.plot_level(level, engine.image());
      }

      #[cfg(feature = "progress")]
      {
        bar.inc(1);
      }
    }
    #[cfg(feature = "progress")]
    {
      bar.finish();
    }

    //(5) binarise
    let mut output = engine.into_image();
    segment::post_process(&mut output);
    log::debug!(
      "flooded {flooded} px from {} maxima ({} sorting errors, {flattened} px flattened), \
       {unresolved} px left unresolved",
      analysis.representatives.len(),
      analysis.sorting_errors
    );

    //(6) print performance report
    #[cfg(feature = "debug")]
    {
      perf.flooded = flooded;
      perf.flattened = flattened;
      perf.unresolved = unresolved;
      perf.total_ms = run_start.elapsed().as_millis() as usize;
    }
    #[cfg(all(feature = "debug", feature = "progress"))]
    {
      //In this combination we have a progress bar, we should use it to print
      bar.println(format!("{perf}"));
    }
    #[cfg(all(feature = "debug", not(feature = "progress")))]
    {
      log::info!("\n{perf}");
    }

    Ok(output)
  }
}

impl Watershed for BinaryWatershed {
  fn distance_map(&self, input: nd::ArrayView2<u8>) -> WatershedResult<nd::Array2<f32>> {
    validate_input(input)?;
    Ok(edm::distance_field(input, &self.mask).into_array())
  }

  fn find_maxima(&self, input: nd::ArrayView2<u8>) -> WatershedResult<Vec<(usize, usize)>> {
    validate_input(input)?;
    let edm = edm::distance_field(input, &self.mask);
    if edm.max() <= 0.0 {
      return Ok(Vec::new());
    }
    Ok(self.analyse(&edm).representatives)
  }

  fn transform(&self, input: nd::ArrayView2<u8>) -> WatershedResult<nd::Array2<u8>> {
    self.run(input, |_, _| Ok(()))
  }

  fn transform_history(
    &self,
    input: nd::ArrayView2<u8>,
  ) -> WatershedResult<Vec<(u8, nd::Array2<u8>)>> {
    let mut history = Vec::new();
    self.run(input, |level, image| {
      history.push((level, image.clone()));
      Ok(())
    })?;
    Ok(history)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_empty_image() {
    let img = nd::Array2::<u8>::zeros((0, 5));
    assert!(matches!(
      validate_input(img.view()),
      Err(WatershedError::EmptyImage { width: 5, height: 0 })
    ));
  }

  #[test]
  fn rejects_two_foreground_values() {
    let img = nd::arr2(&[[0u8, 1, 0], [0, 2, 0]]);
    assert!(matches!(
      validate_input(img.view()),
      Err(WatershedError::NotBinary { first: 1, second: 2 })
    ));
  }

  #[test]
  fn accepts_any_single_foreground_value() {
    let img = nd::arr2(&[[0u8, 7, 0], [7, 7, 0]]);
    assert!(validate_input(img.view()).is_ok());
    assert!(validate_input(img.t()).is_ok());
  }

  #[test]
  fn builder_rejects_bad_tolerance() {
    for tolerance in [-1.0, f32::NAN, f32::INFINITY] {
      assert!(matches!(
        TransformBuilder::new().set_tolerance(tolerance).build(),
        Err(WatershedError::InvalidTolerance(_))
      ));
    }
    assert!(TransformBuilder::new().set_tolerance(0.0).build().is_ok());
  }

  #[test]
  fn labels_follow_scan_order() {
    let watershed = TransformBuilder::new().build().unwrap();
    let img = nd::arr2(&[[0u8, 0, 9, 0], [9, 0, 0, 9], [9, 9, 0, 0]]);
    let labels = watershed.label_regions(img.view());
    //the two right-hand pixels touch diagonally
    assert_eq!(labels, nd::arr2(&[[0, 0, 1, 0], [2, 0, 0, 1], [2, 2, 0, 0]]));
    assert_eq!(watershed.count_regions(img.view()), 2);
  }

  #[cfg(feature = "debug")]
  #[test]
  fn perf_report_counts_flattened_pixels() {
    let perf = crate::performance_monitoring::PerfReport {
      flooded: 12,
      flattened: 3,
      unresolved: 1,
      ..Default::default()
    };
    assert!(format!("{perf}").contains("12 px flooded, 3 px flattened, 1 px unresolved"));
  }

  #[test]
  fn binarize_keeps_sign_and_drops_nan() {
    let watershed = TransformBuilder::new().build().unwrap();
    let img = nd::arr1(&[0.0f64, 1.5, -2.0, f64::NAN]);
    assert_eq!(watershed.binarize(img.view()), nd::arr1(&[0u8, 255, 255, 0]));
  }
}
