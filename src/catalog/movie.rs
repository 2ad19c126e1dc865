//! Movie record and its CSV mapping.

use serde::Serialize;

use crate::catalog::CatalogError;

/// Number of comma-separated columns in a metadata record.
const COLUMNS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub title: String,
    pub genres: Vec<String>,
    pub language: String,
    pub country: String,
    pub release_year: u16,
    pub director: String,
    pub actors: Vec<String>,
    pub imdb_link: String,
    pub watched_date: String,
}

impl Movie {
    /// Parses one metadata record.
    ///
    /// Columns: title, genres, language, country, release year, director,
    /// actors, IMDb link, watched date. Genres and actors are `|`-separated.
    /// `line` is only used for error reporting.
    pub fn from_csv(record: &str, line: usize) -> Result<Self, CatalogError> {
        let values: Vec<&str> = record.split(',').collect();
        if values.len() < COLUMNS {
            return Err(CatalogError::malformed(
                line,
                format!("expected {} columns, found {}", COLUMNS, values.len()),
            ));
        }

        let release_year = values[4].trim().parse::<u16>().map_err(|e| {
            CatalogError::malformed(line, format!("invalid release year '{}': {}", values[4].trim(), e))
        })?;

        let imdb_link = values[7].trim();
        if !(imdb_link.starts_with("http://") || imdb_link.starts_with("https://")) {
            return Err(CatalogError::malformed(
                line,
                format!("invalid imdb link '{}'", imdb_link),
            ));
        }

        Ok(Self {
            title: values[0].to_string(),
            genres: split_list(values[1]),
            language: values[2].trim().to_string(),
            country: values[3].trim().to_string(),
            release_year,
            director: values[5].trim().to_string(),
            actors: split_list(values[6]),
            imdb_link: imdb_link.to_string(),
            watched_date: values[8].trim().to_string(),
        })
    }

    /// Case-insensitive substring match on the director.
    pub fn is_directed_by(&self, director: &str) -> bool {
        self.director
            .to_lowercase()
            .contains(&director.to_lowercase())
    }
}

fn split_list(column: &str) -> Vec<String> {
    column
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = "Avatar,Action|Adventure|Fantasy|Sci-Fi,English,USA,2009,James Cameron,CCH Pounder|Joel David Moore|Wes Studi,http://www.imdb.com/title/tt0499549/?ref_=fn_tt_tt_1,2017-04-09";

    #[test]
    fn test_parse_record() {
        let movie = Movie::from_csv(RECORD, 2).unwrap();
        assert_eq!(movie.title, "Avatar");
        assert_eq!(movie.genres, vec!["Action", "Adventure", "Fantasy", "Sci-Fi"]);
        assert_eq!(movie.language, "English");
        assert_eq!(movie.country, "USA");
        assert_eq!(movie.release_year, 2009);
        assert_eq!(movie.director, "James Cameron");
        assert_eq!(movie.actors.len(), 3);
        assert_eq!(movie.watched_date, "2017-04-09");
    }

    #[test]
    fn test_director_match_ignores_case() {
        let movie = Movie::from_csv(RECORD, 2).unwrap();
        assert!(movie.is_directed_by("cameron"));
        assert!(movie.is_directed_by("JAMES"));
        assert!(!movie.is_directed_by("Nolan"));
    }

    #[test]
    fn test_too_few_columns() {
        let err = Movie::from_csv("Avatar,Action,English", 7).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { line: 7, .. }));
    }

    #[test]
    fn test_bad_release_year() {
        let record = RECORD.replace(",2009,", ",20x9,");
        assert!(matches!(
            Movie::from_csv(&record, 3),
            Err(CatalogError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    fn test_bad_imdb_link() {
        let record = RECORD.replace("http://www.imdb.com", "imdb");
        assert!(Movie::from_csv(&record, 4).is_err());
    }
}
