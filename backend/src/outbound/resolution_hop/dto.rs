//! DTO for the resolution service reply.
//!
//! Only the location and the Celsius value are read; the derived units the
//! resolution service also sends are ignored and recomputed by the caller.

use serde::Deserialize;

use crate::domain::Location;
use crate::domain::ports::HopReply;

#[derive(Debug, Deserialize)]
pub(super) struct ResolutionReplyDto {
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Temperature")]
    temperature: ReplyTemperatureDto,
}

#[derive(Debug, Deserialize)]
struct ReplyTemperatureDto {
    #[serde(rename = "Celsius")]
    celsius: f64,
}

impl ResolutionReplyDto {
    pub(super) fn into_hop_reply(self) -> Result<HopReply, String> {
        let location = Location::new(self.location).map_err(|err| err.to_string())?;
        Ok(HopReply {
            location,
            celsius: self.temperature.celsius,
        })
    }
}
