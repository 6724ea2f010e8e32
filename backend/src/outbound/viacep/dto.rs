//! DTOs for decoding ViaCEP JSON responses.
//!
//! ViaCEP answers unknown codes with `200` and an `erro` flag, sent as either
//! a boolean or the string `"true"` depending on the API revision.

use serde::Deserialize;

use crate::domain::Location;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErroFlagDto {
    Flag(bool),
    Text(String),
}

impl ErroFlagDto {
    fn is_set(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ViaCepResponseDto {
    #[serde(default)]
    erro: Option<ErroFlagDto>,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
}

impl ViaCepResponseDto {
    pub(super) fn is_unknown_code(&self) -> bool {
        self.erro.as_ref().is_some_and(ErroFlagDto::is_set)
    }

    pub(super) fn into_location(self) -> Result<Location, String> {
        let city = self
            .localidade
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .ok_or_else(|| "ViaCEP payload has no `localidade`".to_owned())?;
        let text = match self.uf.as_deref().map(str::trim) {
            Some(state) if !state.is_empty() => format!("{city}, {state}"),
            _ => city.to_owned(),
        };
        Location::new(text).map_err(|err| err.to_string())
    }
}
