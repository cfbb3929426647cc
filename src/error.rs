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

//! Error types for the watershed transform

use thiserror::Error;

/// Errors that can occur while configuring or running a watershed transform.
///
/// Degenerate inputs (no foreground, no maxima) are *not* errors: they simply
/// produce an empty segmentation.
#[derive(Debug, Error)]
pub enum WatershedError {
  /// The input image has no pixels
  #[error("empty image: {width}x{height} has no pixels to segment")]
  EmptyImage { width: usize, height: usize },

  /// The input image holds more than one non-zero value
  #[error("input is not a binary image: found foreground values {first} and {second}")]
  NotBinary { first: u8, second: u8 },

  /// The tolerance used for merging maxima is negative, NaN or infinite
  #[error("invalid tolerance {0}: must be finite and non-negative")]
  InvalidTolerance(f32),

  /// A user-supplied chamfer mask cannot be used for a distance transform
  #[error("invalid chamfer mask: {0}")]
  InvalidMask(String),
}

/// Result type for watershed operations
pub type WatershedResult<T> = Result<T, WatershedError>;
