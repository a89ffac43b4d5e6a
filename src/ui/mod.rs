//! Terminal UI components for stderr (spinner, colors).

mod spinner;
mod style;

pub use spinner::{Spinner, suspend};
pub use style::Style;
