use crate::{MesonetRow, Observation, ParseError};

/// Lazily decoded records from one upstream response body.
pub type ObservationStream<'a> = Box<dyn Iterator<Item = Result<Observation, ParseError>> + 'a>;

/// Turns a raw upstream payload into observations, one record at a time so
/// callers can filter before anything accumulates.
pub trait ObservationParser: Send + Sync {
    fn parse<'a>(&self, body: &'a str) -> Result<ObservationStream<'a>, ParseError>;
}

/// Parser for the mesonet `asos.py` `format=onlycomma` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MesonetCsvParser;

const REQUIRED_COLUMNS: [&str; 2] = ["station", "valid"];

impl ObservationParser for MesonetCsvParser {
    fn parse<'a>(&self, body: &'a str) -> Result<ObservationStream<'a>, ParseError> {
        if body.trim().is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(ParseError::MissingColumn(column));
            }
        }

        Ok(Box::new(reader.into_deserialize::<MesonetRow>().map(
            |row| row.map_err(ParseError::from).and_then(Observation::try_from),
        )))
    }
}
