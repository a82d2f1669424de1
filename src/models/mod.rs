pub mod news;
pub mod price_series;
pub mod selection;
pub mod snapshot;
pub mod universe;

pub use news::*;
pub use price_series::*;
pub use selection::*;
pub use snapshot::*;
pub use universe::*;
