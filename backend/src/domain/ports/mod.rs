//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod location_source;
mod resolution_hop;
mod weather_source;

#[cfg(test)]
pub use location_source::MockLocationSource;
pub use location_source::{
    FIXTURE_LOCATION, FixtureLocationSource, LocationSource, LocationSourceError,
};
#[cfg(test)]
pub use resolution_hop::MockResolutionHop;
pub use resolution_hop::{HopReply, ResolutionHop, ResolutionHopError};
#[cfg(test)]
pub use weather_source::MockWeatherSource;
pub use weather_source::{FIXTURE_CELSIUS, FixtureWeatherSource, WeatherSource, WeatherSourceError};
