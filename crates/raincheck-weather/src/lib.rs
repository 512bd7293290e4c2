//! Precipitation forecast domain crate for raincheck.
//!
//! Provides the date-keyed forecast cache, Nominatim geocoding with a
//! default-location fallback, and the Open-Meteo forecast client used by
//! the interactive CLI.

pub mod cache;
pub mod geocode;
pub mod provider;
pub mod types;

pub use cache::ForecastCache;
pub use geocode::Geocoder;
pub use provider::ForecastProvider;
pub use types::{Coordinate, RainReport, WeatherError};
