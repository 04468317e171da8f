//! Database models and domain types.

use chrono::NaiveDate;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use serde::Serialize;
use tracing::instrument;

use crate::db::{StoreError, schema};

/// Format used for `date_played` in the database and in user input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One recorded play session.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters, Serialize)]
#[diesel(table_name = schema::stats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StatRecord {
    id: i32,
    game_name: String,
    date_played: NaiveDate,
    score: i32,
    comments: Option<String>,
}

impl StatRecord {
    /// Returns the comments, treating a missing value as empty.
    pub fn comments_text(&self) -> &str {
        self.comments.as_deref().unwrap_or("")
    }

    /// Copies the mutable fields into a [`NewStatRecord`], e.g. to pre-fill an edit form.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn to_new(&self) -> NewStatRecord {
        NewStatRecord::new(
            self.game_name.clone(),
            self.date_played,
            self.score,
            self.comments_text().to_string(),
        )
    }
}

/// The mutable fields of a record, used both to insert and to replace.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset, Getters, new)]
#[diesel(table_name = schema::stats)]
pub struct NewStatRecord {
    game_name: String,
    date_played: NaiveDate,
    score: i32,
    comments: String,
}

impl NewStatRecord {
    /// Creates a record with empty comments.
    #[instrument(skip(game_name))]
    pub fn without_comments(game_name: String, date_played: NaiveDate, score: i32) -> Self {
        Self::new(game_name, date_played, score, String::new())
    }

    /// Builds a record from raw user input, validating every field.
    ///
    /// # Errors
    ///
    /// Returns a validation [`StoreError`] if the name is blank, the date is not
    /// `YYYY-MM-DD`, or the score is not a non-negative integer.
    #[instrument(skip(comments))]
    pub fn parse(
        game_name: &str,
        date_played: &str,
        score: &str,
        comments: &str,
    ) -> Result<Self, StoreError> {
        let date_played = parse_date(date_played)?;
        let score = score
            .trim()
            .parse::<i32>()
            .map_err(|_| StoreError::validation(format!("Score must be a whole number, got '{}'", score.trim())))?;
        let record = Self::new(
            game_name.trim().to_string(),
            date_played,
            score,
            comments.trim().to_string(),
        );
        record.validate()?;
        Ok(record)
    }

    /// Checks the data model invariants.
    ///
    /// # Errors
    ///
    /// Returns a validation [`StoreError`] if the game name is blank or the
    /// score is negative.
    #[instrument(skip(self), fields(game_name = %self.game_name, score = self.score))]
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.game_name.trim().is_empty() {
            return Err(StoreError::validation("Game name must not be empty"));
        }
        if self.score < 0 {
            return Err(StoreError::validation(format!(
                "Score must not be negative, got {}",
                self.score
            )));
        }
        Ok(())
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns a validation [`StoreError`] for anything else.
#[instrument]
pub fn parse_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| StoreError::validation(format!("Date must be YYYY-MM-DD, got '{}'", s.trim())))
}

/// Scores over time, ascending by date, as parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize)]
pub struct ChartSeries {
    games: Vec<String>,
    dates: Vec<NaiveDate>,
    scores: Vec<i32>,
}

impl ChartSeries {
    /// Projects records, keeping their order.
    #[instrument(skip(records), fields(count = records.len()))]
    pub fn from_records(records: &[StatRecord]) -> Self {
        let mut series = Self::default();
        for record in records {
            series.games.push(record.game_name.clone());
            series.dates.push(record.date_played);
            series.scores.push(record.score);
        }
        series
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterates `(game, date, score)` triples in chart order.
    pub fn points(&self) -> impl Iterator<Item = (&str, NaiveDate, i32)> + '_ {
        self.games
            .iter()
            .zip(&self.dates)
            .zip(&self.scores)
            .map(|((game, date), score)| (game.as_str(), *date, *score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).expect("valid date")
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let record = NewStatRecord::without_comments("   ".to_string(), date("2024-01-01"), 3);
        let err = record.validate().expect_err("blank name accepted");
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_negative_score() {
        let record = NewStatRecord::without_comments("Chess".to_string(), date("2024-01-01"), -1);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_zero_score() {
        let record = NewStatRecord::without_comments("Chess".to_string(), date("2024-01-01"), 0);
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_parse_trims_input() {
        let record = NewStatRecord::parse("  Chess ", " 2024-01-15", " 10 ", " first game ")
            .expect("Parse failed");
        assert_eq!(record.game_name(), "Chess");
        assert_eq!(*record.date_played(), date("2024-01-15"));
        assert_eq!(*record.score(), 10);
        assert_eq!(record.comments(), "first game");
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let err = NewStatRecord::parse("Chess", "15/01/2024", "10", "").expect_err("bad date");
        assert!(err.is_validation());
        assert!(NewStatRecord::parse("Chess", "2024-02-30", "10", "").is_err());
    }

    #[test]
    fn test_parse_rejects_non_integer_score() {
        assert!(NewStatRecord::parse("Chess", "2024-01-15", "ten", "").is_err());
        assert!(NewStatRecord::parse("Chess", "2024-01-15", "1.5", "").is_err());
        assert!(NewStatRecord::parse("Chess", "2024-01-15", "-4", "").is_err());
    }

    #[test]
    fn test_chart_series_points_follow_input_order() {
        let records = vec![
            StatRecord {
                id: 1,
                game_name: "Go".to_string(),
                date_played: date("2024-01-01"),
                score: 4,
                comments: None,
            },
            StatRecord {
                id: 2,
                game_name: "Chess".to_string(),
                date_played: date("2024-02-01"),
                score: 9,
                comments: Some("close".to_string()),
            },
        ];

        let series = ChartSeries::from_records(&records);
        assert_eq!(series.len(), 2);
        let points: Vec<_> = series.points().collect();
        assert_eq!(points[0], ("Go", date("2024-01-01"), 4));
        assert_eq!(points[1], ("Chess", date("2024-02-01"), 9));
        assert_eq!(records[0].comments_text(), "");
        assert_eq!(records[1].to_new().comments(), "close");
    }
}
