//! Sort order verification.
//!
//! Checks that a sequence is non-decreasing under a key, which is the
//! guarantee both sorters give regardless of how they break ties.

use crate::dataset::{read_records, DatasetError};
use crate::key::KeyExtractor;
use crate::record::Record;
use crate::sort::{Comparator, SortError};
use std::cmp::Ordering;
use std::path::Path;

/// Verify that `items` are ordered by the extractor's key.
///
/// Returns `SortError::Unsorted` with the index of the first record whose
/// key is smaller than its predecessor's.
///
/// # Example
///
/// ```
/// use tunesort::key::KeyFn;
/// use tunesort::validation::verify_sorted;
///
/// assert!(verify_sorted(&[1, 2, 2, 5], &KeyFn::new(|n: &i32| *n)).is_ok());
/// assert!(verify_sorted(&[1, 3, 2], &KeyFn::new(|n: &i32| *n)).is_err());
/// ```
pub fn verify_sorted<T, E>(items: &[T], extractor: &E) -> Result<(), SortError>
where
    E: KeyExtractor<T>,
{
    let mut cmp = Comparator::new();
    let mut prev: Option<E::Key> = None;

    for (index, item) in items.iter().enumerate() {
        let key = extractor.extract(item)?;
        if let Some(ref p) = prev {
            if cmp.compare(p, &key)? == Ordering::Greater {
                return Err(SortError::Unsorted { index });
            }
        }
        prev = Some(key);
    }

    Ok(())
}

/// Verify that a dataset file is ordered by the extractor's key.
///
/// Returns the number of records checked.
pub fn verify_sorted_file<P, E>(path: P, extractor: &E) -> Result<usize, DatasetError>
where
    P: AsRef<Path>,
    E: KeyExtractor<Record>,
{
    let records = read_records(path)?;
    verify_sorted(&records, extractor)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::GenreKey;

    fn song(genres: &str) -> Record {
        Record::new().with("genres", genres)
    }

    #[test]
    fn test_sorted_with_ties() {
        let records = vec![song(""), song("Jazz"), song("Jazz"), song("Rock")];
        assert!(verify_sorted(&records, &GenreKey::new()).is_ok());
    }

    #[test]
    fn test_reports_first_offender() {
        let records = vec![song("Jazz"), song("Rock"), song("Pop"), song("Blues")];
        assert_eq!(
            verify_sorted(&records, &GenreKey::new()),
            Err(SortError::Unsorted { index: 2 })
        );
    }

    #[test]
    fn test_empty_is_sorted() {
        let records: Vec<Record> = Vec::new();
        assert!(verify_sorted(&records, &GenreKey::new()).is_ok());
    }

    #[test]
    fn test_extraction_error_propagates() {
        let records = vec![song("Jazz"), Record::new().with("genres", 5)];
        assert!(matches!(
            verify_sorted(&records, &GenreKey::new()),
            Err(SortError::KeyExtraction { .. })
        ));
    }
}
