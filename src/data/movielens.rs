use std::io::{BufRead, Read};

use chrono::DateTime;

use super::DataError;
use crate::models::{ItemId, Movie, RatingEvent, RatingScale};
use crate::services::similarity::FullSimilarityMatrix;

const FIELD_SEPARATOR: &str = "::";

fn parse_error(file: &'static str, line: usize, message: impl Into<String>) -> DataError {
    DataError::Parse {
        file,
        line,
        message: message.into(),
    }
}

fn parse_field<T: std::str::FromStr>(
    file: &'static str,
    line: usize,
    name: &str,
    raw: Option<&str>,
) -> Result<T, DataError> {
    let raw = raw.ok_or_else(|| parse_error(file, line, format!("missing {name}")))?;
    raw.trim()
        .parse()
        .map_err(|_| parse_error(file, line, format!("invalid {name}: {raw:?}")))
}

/// Parses `ratings.dat` (`UserID::MovieID::Rating::Timestamp`)
///
/// Ratings outside `scale` are rejected.
pub fn parse_ratings<R: BufRead>(reader: R, scale: RatingScale) -> Result<Vec<RatingEvent>, DataError> {
    const FILE: &str = "ratings.dat";
    let mut events = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| DataError::Read { file: FILE, source })?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split(FIELD_SEPARATOR);
        let user_id: u32 = parse_field(FILE, line_no, "user id", fields.next())?;
        let item_id: ItemId = parse_field(FILE, line_no, "movie id", fields.next())?;
        let rating: f64 = parse_field(FILE, line_no, "rating", fields.next())?;
        let seconds: i64 = parse_field(FILE, line_no, "timestamp", fields.next())?;

        if !scale.contains(rating) {
            return Err(parse_error(
                FILE,
                line_no,
                format!("rating {rating} outside [{}, {}]", scale.min, scale.max),
            ));
        }
        let timestamp = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| parse_error(FILE, line_no, format!("timestamp {seconds} out of range")))?;

        events.push(RatingEvent {
            user_id,
            item_id,
            rating,
            timestamp,
        });
    }

    Ok(events)
}

/// Parses `movies.dat` (`MovieID::Title::Genres`), which is ISO-8859-1 encoded
pub fn parse_movies<R: Read>(mut reader: R) -> Result<Vec<Movie>, DataError> {
    const FILE: &str = "movies.dat";
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| DataError::Read { file: FILE, source })?;

    // Every Latin-1 byte is the Unicode code point of the same value
    let text: String = bytes.iter().map(|&b| b as char).collect();

    let mut movies = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(3, FIELD_SEPARATOR);
        let id: ItemId = parse_field(FILE, line_no, "movie id", fields.next())?;
        let title = fields
            .next()
            .ok_or_else(|| parse_error(FILE, line_no, "missing title"))?;
        let genres = fields
            .next()
            .map(|g| {
                g.split('|')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        movies.push(Movie::new(id, title.trim()).with_genres(genres));
    }

    Ok(movies)
}

/// Distinct movie ids that received at least one rating, ascending
///
/// This is the row and column order of the precomputed similarity matrix.
pub fn rated_items(events: &[RatingEvent]) -> Vec<ItemId> {
    let mut items: Vec<ItemId> = events.iter().map(|e| e.item_id).collect();
    items.sort_unstable();
    items.dedup();
    items
}

fn parse_similarity_cell(raw: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let cell = raw.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = cell.parse()?;
    Ok(value.is_finite().then_some(value))
}

/// Parses `s_matrix.csv`: a header row, then one row per movie whose first
/// field is a row label
///
/// Row and column labels are ignored; `items` gives the order. Empty, `NA`
/// and `NaN` cells are undefined similarities.
pub fn parse_similarity<R: Read>(
    reader: R,
    items: Vec<ItemId>,
) -> Result<FullSimilarityMatrix, DataError> {
    const FILE: &str = "s_matrix.csv";
    let mut rows = Vec::with_capacity(items.len());

    // Row lengths are checked by FullSimilarityMatrix, which reports them
    // against the item count
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    for result in reader.records() {
        let record = result.map_err(|source| DataError::Csv { file: FILE, source })?;
        let line_no = record.position().map_or(0, |p| p.line() as usize);

        let row = record
            .iter()
            .skip(1)
            .map(|cell| {
                parse_similarity_cell(cell)
                    .map_err(|_| parse_error(FILE, line_no, format!("invalid similarity: {cell:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(FullSimilarityMatrix::new(items, rows)?)
}
