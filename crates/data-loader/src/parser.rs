//! Parser for MovieLens 100K data files.
//!
//! - u.user: userId|age|gender|occupation|zipcode
//! - u.item: movieId|title|release date|video release date|IMDb URL|19 genre flags
//! - u.data: userId<TAB>movieId<TAB>rating<TAB>timestamp

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const USERS_FILE: &str = "u.user";
pub const MOVIES_FILE: &str = "u.item";
pub const RATINGS_FILE: &str = "u.data";

/// Number of leading non-genre columns in u.item
const MOVIE_META_FIELDS: usize = 5;

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// MovieLens ships ISO-8859-1, where each byte maps directly to a Unicode
/// code point, so the conversion to UTF-8 is lossless.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Parse every non-empty line of `path` with `parse_line`.
fn parse_file<T>(
    path: &Path,
    parse_line: impl Fn(&str, usize) -> Result<T>,
) -> Result<Vec<T>> {
    let lines = read_lines_latin1(path)?;
    let mut records = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        records.push(parse_line(line_trimmed, idx + 1)?);
    }
    Ok(records)
}

/// Split a line and check it has exactly `expected` fields.
fn split_fields<'a>(
    line: &'a str,
    separator: char,
    expected: usize,
    file: &str,
    line_no: usize,
) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = line.split(separator).collect();
    if fields.len() != expected {
        return Err(DataLoadError::FieldCountMismatch {
            file: file.to_string(),
            expected,
            found: fields.len(),
            line: line_no,
        });
    }
    Ok(fields)
}

/// Parse a numeric field, attaching file/line context on failure.
fn parse_number<T>(value: &str, name: &str, file: &str, line_no: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid {}: {}", name, e),
    })
}

fn parse_gender(s: &str) -> Result<Gender> {
    match s {
        "M" => Ok(Gender::Male),
        "F" => Ok(Gender::Female),
        _ => Err(DataLoadError::InvalidValue {
            field: "gender",
            value: s.to_string(),
        }),
    }
}

/// Parse one line of u.user
pub fn parse_user_line(line: &str, line_no: usize) -> Result<User> {
    let fields = split_fields(line, '|', 5, USERS_FILE, line_no)?;

    Ok(User {
        id: parse_number(fields[0], "userId", USERS_FILE, line_no)?,
        age: parse_number(fields[1], "age", USERS_FILE, line_no)?,
        gender: parse_gender(fields[2])?,
        occupation: fields[3].to_string(),
        zipcode: fields[4].to_string(),
    })
}

/// Parse one line of u.item
///
/// Genre flags are "0"/"1" in GenreSet order; anything else is rejected.
pub fn parse_movie_line(line: &str, line_no: usize) -> Result<Movie> {
    let expected = MOVIE_META_FIELDS + Genre::ALL.len();
    let fields = split_fields(line, '|', expected, MOVIES_FILE, line_no)?;

    let title = fields[1];
    let release_date = fields[2];

    let mut genres = Vec::new();
    for (genre, flag) in Genre::ALL.iter().zip(&fields[MOVIE_META_FIELDS..]) {
        match *flag {
            "1" => genres.push(*genre),
            "0" => {}
            other => {
                return Err(DataLoadError::ParseError {
                    file: MOVIES_FILE.to_string(),
                    line: line_no,
                    reason: format!("Invalid flag '{}' for genre {}", other, genre),
                });
            }
        }
    }

    Ok(Movie {
        id: parse_number(fields[0], "movieId", MOVIES_FILE, line_no)?,
        title: title.to_string(),
        year: extract_year_from_title(title).or_else(|| extract_year_from_date(release_date)),
        genres,
    })
}

/// Parse one line of u.data
pub fn parse_rating_line(line: &str, line_no: usize) -> Result<Rating> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(DataLoadError::FieldCountMismatch {
            file: RATINGS_FILE.to_string(),
            expected: 4,
            found: fields.len(),
            line: line_no,
        });
    }

    Ok(Rating {
        user_id: parse_number(fields[0], "userId", RATINGS_FILE, line_no)?,
        movie_id: parse_number(fields[1], "movieId", RATINGS_FILE, line_no)?,
        rating: parse_number(fields[2], "rating", RATINGS_FILE, line_no)?,
        timestamp: parse_number(fields[3], "timestamp", RATINGS_FILE, line_no)?,
    })
}

/// Parse the u.user file
pub fn parse_users(path: &Path) -> Result<Vec<User>> {
    parse_file(path, parse_user_line)
}

/// Parse the u.item file
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    parse_file(path, parse_movie_line)
}

/// Parse the u.data file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    parse_file(path, parse_rating_line)
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        return title[start + 1..end].parse::<u16>().ok();
    }
    None
}

/// Extract year from a release date such as "01-Jan-1995"
fn extract_year_from_date(date: &str) -> Option<u16> {
    let date = date.trim();
    date.len()
        .checked_sub(4)
        .and_then(|start| date.get(start..))
        .and_then(|year| year.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_STORY: &str = concat!(
        "1|Toy Story (1995)|01-Jan-1995||",
        "http://us.imdb.com/M/title-exact?Toy%20Story%20(1995)|",
        "0|0|0|1|1|1|0|0|0|0|0|0|0|0|0|0|0|0|0"
    );

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Movie Title"), None);
        assert_eq!(extract_year_from_date("01-Jan-1995"), Some(1995));
        assert_eq!(extract_year_from_date(""), None);
    }

    #[test]
    fn test_parse_movie_line() {
        let movie = parse_movie_line(TOY_STORY, 1).unwrap();
        assert_eq!(movie.id, 1);
        assert_eq!(movie.title, "Toy Story (1995)");
        assert_eq!(movie.year, Some(1995));
        assert_eq!(
            movie.genres,
            vec![Genre::Animation, Genre::Children, Genre::Comedy]
        );
    }

    #[test]
    fn test_parse_movie_line_unknown_genre_and_missing_date() {
        let line = "267|unknown||||1|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0";
        let movie = parse_movie_line(line, 267).unwrap();
        assert_eq!(movie.year, None);
        assert_eq!(movie.genres, vec![Genre::Unknown]);
    }

    #[test]
    fn test_parse_movie_line_rejects_short_line() {
        let err = parse_movie_line("1|Toy Story (1995)|01-Jan-1995", 7).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::FieldCountMismatch { expected: 24, found: 3, line: 7, .. }
        ));
    }

    #[test]
    fn test_parse_user_line() {
        let user = parse_user_line("1|24|M|technician|85711", 1).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.age, 24);
        assert_eq!(user.gender, Gender::Male);
        assert_eq!(user.occupation, "technician");
        assert!(parse_user_line("2|53|X|other|94043", 2).is_err());
    }

    #[test]
    fn test_parse_rating_line() {
        let rating = parse_rating_line("196\t242\t3\t881250949", 1).unwrap();
        assert_eq!(rating.user_id, 196);
        assert_eq!(rating.movie_id, 242);
        assert_eq!(rating.rating, 3.0);
        assert_eq!(rating.timestamp, 881250949);

        let err = parse_rating_line("196\tabc\t3\t881250949", 4).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 4, .. }));
    }

    #[test]
    fn test_genre_labels_round_trip() {
        for genre in Genre::ALL {
            assert_eq!(genre.label().parse::<Genre>().unwrap(), genre);
        }
        assert!("Noir".parse::<Genre>().is_err());
    }
}
