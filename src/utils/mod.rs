pub mod error;
pub mod geo;

pub use error::ApiError;
pub use geo::great_circle_km;
