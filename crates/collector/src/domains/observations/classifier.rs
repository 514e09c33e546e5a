use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The tracked dust and sand phenomenon codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DustCode {
    #[serde(rename = "DU")]
    Dust,
    #[serde(rename = "SA")]
    Sand,
    #[serde(rename = "BLSA")]
    BlowingSand,
    #[serde(rename = "BLDU")]
    BlowingDust,
    #[serde(rename = "SS")]
    Sandstorm,
    #[serde(rename = "DS")]
    Duststorm,
    #[serde(rename = "PO")]
    DustWhirls,
}

impl DustCode {
    pub const ALL: [DustCode; 7] = [
        DustCode::Dust,
        DustCode::Sand,
        DustCode::BlowingSand,
        DustCode::BlowingDust,
        DustCode::Sandstorm,
        DustCode::Duststorm,
        DustCode::DustWhirls,
    ];

    /// Order used to pick one phenomenon when several co-occur: most severe first.
    pub const PRIORITY: [DustCode; 7] = [
        DustCode::Duststorm,
        DustCode::Sandstorm,
        DustCode::BlowingDust,
        DustCode::BlowingSand,
        DustCode::Dust,
        DustCode::Sand,
        DustCode::DustWhirls,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DustCode::Dust => "DU",
            DustCode::Sand => "SA",
            DustCode::BlowingSand => "BLSA",
            DustCode::BlowingDust => "BLDU",
            DustCode::Sandstorm => "SS",
            DustCode::Duststorm => "DS",
            DustCode::DustWhirls => "PO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DustCode::Dust => "DU (Dust)",
            DustCode::Sand => "SA (Sand)",
            DustCode::BlowingSand => "BLSA (Blowing Sand)",
            DustCode::BlowingDust => "BLDU (Blowing Dust)",
            DustCode::Sandstorm => "SS (Sandstorm)",
            DustCode::Duststorm => "DS (Duststorm)",
            DustCode::DustWhirls => "PO (Dust Whirls)",
        }
    }

    pub fn is_severe(self) -> bool {
        matches!(self, DustCode::Duststorm | DustCode::Sandstorm)
    }

    /// Match a single whitespace-delimited token, allowing one `+`/`-` intensity prefix.
    pub fn from_token(token: &str) -> Option<DustCode> {
        let bare = token
            .strip_prefix('+')
            .or_else(|| token.strip_prefix('-'))
            .unwrap_or(token);
        DustCode::ALL
            .into_iter()
            .find(|code| code.code().eq_ignore_ascii_case(bare))
    }
}

impl fmt::Display for DustCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for DustCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DustCode::from_token(s.trim()).ok_or_else(|| format!("unknown dust code: {}", s))
    }
}

/// Every tracked code in a phenomenon string, one per matching token, in order.
pub fn dust_codes(wx_codes: &str) -> impl Iterator<Item = DustCode> + '_ {
    wx_codes.split_whitespace().filter_map(DustCode::from_token)
}

/// Whether a phenomenon string reports at least one tracked code.
pub fn is_dust(wx_codes: Option<&str>) -> bool {
    wx_codes.is_some_and(|wx| dust_codes(wx).next().is_some())
}

/// The single most severe tracked code present, by [`DustCode::PRIORITY`].
pub fn primary_phenomenon(wx_codes: Option<&str>) -> Option<DustCode> {
    let wx = wx_codes?;
    DustCode::PRIORITY
        .into_iter()
        .find(|candidate| dust_codes(wx).any(|code| code == *candidate))
}
