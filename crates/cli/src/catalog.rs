//! Pure catalog views over a fetched book list: filtering, summary
//! statistics and the year choices offered for filtering.

use std::collections::{BTreeSet, HashSet};

use crate::client::Book;

/// Empty strings and `None` mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        let title_ok = match non_empty(&self.title) {
            Some(needle) => contains_ignore_case(&book.title, needle),
            None => true,
        };
        let author_ok = match non_empty(&self.author) {
            Some(needle) => book
                .author
                .as_deref()
                .is_some_and(|author| contains_ignore_case(author, needle)),
            None => true,
        };
        let year_ok = self.year.map_or(true, |year| book.published_year == Some(year));

        title_ok && author_ok && year_ok
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn filter<'a>(books: &'a [Book], criteria: &BookFilter) -> Vec<&'a Book> {
    books.iter().filter(|book| criteria.matches(book)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub unique_authors: usize,
    pub latest_year: Option<i32>,
    pub oldest_year: Option<i32>,
}

impl Statistics {
    pub fn from_books(books: &[Book]) -> Self {
        let authors: HashSet<&str> = books
            .iter()
            .filter_map(|book| book.author.as_deref())
            .collect();
        let years = books.iter().filter_map(|book| book.published_year);

        Self {
            total: books.len(),
            unique_authors: authors.len(),
            latest_year: years.clone().max(),
            oldest_year: years.min(),
        }
    }
}

/// Distinct publication years, newest first.
pub fn year_options(books: &[Book]) -> Vec<i32> {
    let years: BTreeSet<i32> = books.iter().filter_map(|book| book.published_year).collect();
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: Option<&str>, year: Option<i32>) -> Book {
        Book {
            id: format!("{:0>24}", title.len()),
            title: title.to_string(),
            author: author.map(str::to_string),
            published_year: year,
        }
    }

    fn shelf() -> Vec<Book> {
        vec![
            book("The Great Gatsby", Some("F. Scott Fitzgerald"), Some(1925)),
            book("1984", Some("George Orwell"), Some(1949)),
            book("Animal Farm", Some("George Orwell"), Some(1945)),
            book("Anonymous Pamphlet", None, None),
        ]
    }

    #[test]
    fn title_filter_is_case_insensitive_substring() {
        let books = shelf();
        let criteria = BookFilter {
            title: Some("gReAt".to_string()),
            ..BookFilter::default()
        };
        let found = filter(&books, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "The Great Gatsby");
    }

    #[test]
    fn author_filter_skips_authorless_books() {
        let books = shelf();
        let criteria = BookFilter {
            author: Some("o".to_string()),
            ..BookFilter::default()
        };
        let titles: Vec<_> = filter(&books, &criteria)
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, ["The Great Gatsby", "1984", "Animal Farm"]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let books = shelf();
        let criteria = BookFilter {
            title: Some(String::new()),
            author: Some(String::new()),
            year: None,
        };
        assert_eq!(filter(&books, &criteria).len(), books.len());
    }

    #[test]
    fn year_filter_is_exact() {
        let books = shelf();
        let criteria = BookFilter {
            author: Some("orwell".to_string()),
            year: Some(1949),
            ..BookFilter::default()
        };
        let found = filter(&books, &criteria);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "1984");
    }

    #[test]
    fn statistics_over_shelf() {
        let stats = Statistics::from_books(&shelf());
        assert_eq!(
            stats,
            Statistics {
                total: 4,
                unique_authors: 2,
                latest_year: Some(1949),
                oldest_year: Some(1925),
            }
        );
    }

    #[test]
    fn statistics_without_years() {
        let stats = Statistics::from_books(&[book("Untitled", None, None)]);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.unique_authors, 0);
        assert_eq!(stats.latest_year, None);
        assert_eq!(stats.oldest_year, None);
    }

    #[test]
    fn year_options_are_distinct_newest_first() {
        let mut books = shelf();
        books.push(book("Another 1949", None, Some(1949)));
        assert_eq!(year_options(&books), vec![1949, 1945, 1925]);
    }
}
