use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Language codes supported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LangCode {
    #[default]
    En,
    Fr,
    Nl,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown language code: {raw}")]
pub struct UnknownLangCode {
    raw: String,
}

impl LangCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LangCode::En => "en",
            LangCode::Fr => "fr",
            LangCode::Nl => "nl",
        }
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LangCode {
    type Err = UnknownLangCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(LangCode::En),
            "fr" => Ok(LangCode::Fr),
            "nl" => Ok(LangCode::Nl),
            other => Err(UnknownLangCode {
                raw: other.to_string(),
            }),
        }
    }
}
