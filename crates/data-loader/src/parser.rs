//! Parsers for MovieLens data files.
//!
//! Two layouts are supported:
//! - CSV (ml-latest-small): `movieId,title,genres` and
//!   `userId,movieId,rating,timestamp`, with a header row and quoted titles
//! - `.dat` (ml-1m): `movieId::title::genres` and
//!   `userId::movieId::rating::timestamp`, Latin-1 encoded
//!
//! Columns are read by position, not by header name. Every rating score is
//! rescaled with [`rescale_score`] as it is parsed.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Open a data file, mapping "not found" to a dedicated error.
fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Split a pipe-delimited genre field, keeping source order.
fn parse_genres(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split('|').map(str::to_string).collect()
}

// =============================================================================
// CSV layout
// =============================================================================

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
        _ => DataLoadError::ParseError {
            file: file.to_string(),
            line,
            reason,
        },
    }
}

fn csv_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = open_file(path)?;
    Ok(csv::ReaderBuilder::new().has_headers(true).from_reader(file))
}

/// Parse a `movies.csv` file into movie records.
pub fn load_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = file_name(path);
    let mut reader = csv_reader(path)?;
    let mut movies = Vec::new();

    for row in reader.deserialize::<(MovieId, String, String)>() {
        let (id, title, genres) = row.map_err(|e| csv_error(&file, e))?;
        movies.push(Movie {
            id,
            title,
            genres: parse_genres(&genres),
        });
    }
    Ok(movies)
}

/// Parse a `ratings.csv` file into rescaled rating records.
pub fn load_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = file_name(path);
    let mut reader = csv_reader(path)?;
    let mut ratings = Vec::new();

    for row in reader.deserialize::<(UserId, MovieId, f32, i64)>() {
        let (user_id, movie_id, raw, timestamp) = row.map_err(|e| csv_error(&file, e))?;
        ratings.push(Rating {
            user_id,
            movie_id,
            score: rescale_score(raw),
            timestamp,
        });
    }
    Ok(ratings)
}

// =============================================================================
// `.dat` layout
// =============================================================================

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// Every Latin-1 byte maps directly to the Unicode code point of the same value.
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let mut file = open_file(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    let content: String = bytes.iter().map(|&b| b as char).collect();

    Ok(content.lines().map(|s| s.to_string()).collect())
}

/// Pull the next `::`-separated field or report which one is missing.
fn next_field<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    file: &str,
    line: usize,
    field: &str,
) -> Result<&'a str> {
    parts.next().ok_or_else(|| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Missing {}", field),
    })
}

fn parse_field<T>(value: &str, file: &str, line: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line,
        reason: format!("Invalid {}: {}", field, e),
    })
}

/// Parse a `movies.dat` file
///
/// Format: movieId::title::genres
pub fn load_movies_dat(path: &Path) -> Result<Vec<Movie>> {
    let file = file_name(path);
    let lines = read_lines_latin1(path)?;
    let mut movies = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let movie_id = next_field(&mut parts, &file, line_no, "movieId")?;
        let title = next_field(&mut parts, &file, line_no, "title")?;
        let genres = next_field(&mut parts, &file, line_no, "genres")?;

        movies.push(Movie {
            id: parse_field(movie_id, &file, line_no, "movieId")?,
            title: title.to_string(),
            genres: parse_genres(genres),
        });
    }
    Ok(movies)
}

/// Parse a `ratings.dat` file
///
/// Format: userId::movieId::rating::timestamp
pub fn load_ratings_dat(path: &Path) -> Result<Vec<Rating>> {
    let file = file_name(path);
    let lines = read_lines_latin1(path)?;
    let mut ratings = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split("::");
        let user_id = next_field(&mut parts, &file, line_no, "userId")?;
        let movie_id = next_field(&mut parts, &file, line_no, "movieId")?;
        let raw = next_field(&mut parts, &file, line_no, "rating")?;
        let timestamp = next_field(&mut parts, &file, line_no, "timestamp")?;

        let raw: f32 = parse_field(raw, &file, line_no, "rating")?;
        ratings.push(Rating {
            user_id: parse_field(user_id, &file, line_no, "userId")?,
            movie_id: parse_field(movie_id, &file, line_no, "movieId")?,
            score: rescale_score(raw),
            timestamp: parse_field(timestamp, &file, line_no, "timestamp")?,
        });
    }
    Ok(ratings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(parse_genres("Action|Comedy"), vec!["Action", "Comedy"]);
        assert_eq!(parse_genres("Drama"), vec!["Drama"]);
        assert!(parse_genres("").is_empty());
    }

    #[test]
    fn test_load_movies_csv_quoted_title() {
        let file = write_fixture(
            "movieId,title,genres\n\
             1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
             11,\"American President, The (1995)\",Comedy|Drama|Romance\n",
        );

        let movies = load_movies(file.path()).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 1);
        assert_eq!(movies[0].genres.len(), 5);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].genres, vec!["Comedy", "Drama", "Romance"]);
    }

    #[test]
    fn test_load_ratings_csv_rescales() {
        let file = write_fixture(
            "userId,movieId,rating,timestamp\n\
             1,10,5.0,964982703\n\
             1,20,1.0,964981247\n\
             2,10,3.5,964982224\n",
        );

        let ratings = load_ratings(file.path()).unwrap();

        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[0].score, 2.0);
        assert_eq!(ratings[1].score, -2.0);
        assert_eq!(ratings[2].score, 0.5);
        assert_eq!(ratings[2].timestamp, 964982224);
    }

    #[test]
    fn test_columns_are_positional() {
        // Header names do not matter, only column order
        let file = write_fixture("usuarioId,filmeId,nota,momento\n7,70,4,1\n");

        let ratings = load_ratings(file.path()).unwrap();

        assert_eq!(ratings[0].user_id, 7);
        assert_eq!(ratings[0].movie_id, 70);
        assert_eq!(ratings[0].score, 1.0);
    }

    #[test]
    fn test_load_ratings_csv_bad_row() {
        let file = write_fixture("userId,movieId,rating,timestamp\n1,abc,4.0,1\n");

        let err = load_ratings(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_movies(Path::new("/definitely/not/here/movies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_dat_files() {
        let movies = write_fixture(
            "1::Toy Story (1995)::Animation|Children's|Comedy\n\
             2::Jumanji (1995)::Adventure|Children's|Fantasy\n",
        );
        let ratings = write_fixture("1::1::5::978300760\n\n1::2::3::978302109\n");

        let movies = load_movies_dat(movies.path()).unwrap();
        let ratings = load_ratings_dat(ratings.path()).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].genres[1], "Children's");
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[0].score, 2.0);
        assert_eq!(ratings[1].score, 0.0);
    }

    #[test]
    fn test_load_dat_missing_field() {
        let ratings = write_fixture("1::1::5\n");

        let err = load_ratings_dat(ratings.path()).unwrap_err();
        match err {
            DataLoadError::ParseError { line, reason, .. } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "Missing timestamp");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
