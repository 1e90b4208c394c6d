// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for intersection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up an intersection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid control grid: {0}")]
    InvalidGrid(String),

    #[error("Control grids differ in size: {left:?} vs {right:?}")]
    GridMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}
