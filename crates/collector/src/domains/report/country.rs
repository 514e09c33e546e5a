use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve tracked countries, in the order reports list them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "Saudi Arabia")]
    SaudiArabia,
    Kuwait,
    Bahrain,
    Qatar,
    #[serde(rename = "UAE")]
    Uae,
    Oman,
    Yemen,
    Jordan,
    Iraq,
    Syria,
    Lebanon,
    Iran,
}

/// ICAO location prefix of each tracked country.
pub const COUNTRY_PREFIXES: [(&str, Country); 12] = [
    ("OE", Country::SaudiArabia),
    ("OI", Country::Iran),
    ("OR", Country::Iraq),
    ("OJ", Country::Jordan),
    ("OK", Country::Kuwait),
    ("OB", Country::Bahrain),
    ("OT", Country::Qatar),
    ("OM", Country::Uae),
    ("OO", Country::Oman),
    ("OL", Country::Lebanon),
    ("OS", Country::Syria),
    ("OY", Country::Yemen),
];

impl Country {
    pub const ALL: [Country; 12] = [
        Country::SaudiArabia,
        Country::Kuwait,
        Country::Bahrain,
        Country::Qatar,
        Country::Uae,
        Country::Oman,
        Country::Yemen,
        Country::Jordan,
        Country::Iraq,
        Country::Syria,
        Country::Lebanon,
        Country::Iran,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Country::SaudiArabia => "Saudi Arabia",
            Country::Kuwait => "Kuwait",
            Country::Bahrain => "Bahrain",
            Country::Qatar => "Qatar",
            Country::Uae => "UAE",
            Country::Oman => "Oman",
            Country::Yemen => "Yemen",
            Country::Jordan => "Jordan",
            Country::Iraq => "Iraq",
            Country::Syria => "Syria",
            Country::Lebanon => "Lebanon",
            Country::Iran => "Iran",
        }
    }

    /// Country owning a station, from the first two letters of its identifier.
    /// `None` for anything outside the tracked region.
    pub fn from_station(station: &str) -> Option<Country> {
        let prefix = station.get(..2)?;
        COUNTRY_PREFIXES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(prefix))
            .map(|(_, country)| *country)
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
