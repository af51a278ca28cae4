//! The image backend seam.
//!
//! | Operation | Who does it |
//! |---|---|
//! | **Encode** (resize + transcode) | an [`ImageBackend`] implementation |
//! | **Probe** (intrinsic dimensions) | an [`ImageBackend`] implementation |
//! | **Derivative planning** | [`calculate_derivative_sizes`], [`plan_encoded_set`] |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait, [`BackendError`], [`Dimensions`]
//! - **Parameters**: [`EncodeOptions`] describing one encode call
//! - **Calculations**: pure functions for derivative dimensions (unit testable)

pub mod backend;
mod calculations;
mod params;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{DerivativeSize, calculate_derivative_sizes, plan_encoded_set};
pub use params::EncodeOptions;
