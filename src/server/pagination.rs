pub const QUESTIONS_PER_PAGE: usize = 10;

/// Returns the 1-indexed `page` of `items`: `[(page - 1) * 10, page * 10)`.
/// Pages below 1 and pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|offset| usize::try_from(offset).ok())
        .and_then(|offset| offset.checked_mul(QUESTIONS_PER_PAGE))
    else {
        return Vec::new();
    };
    items
        .into_iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: i64) -> Vec<i64> {
        (1..=n).collect()
    }

    #[test]
    fn slices_full_and_partial_pages() {
        assert_eq!(paginate(numbers(25), 1), numbers(10));
        assert_eq!(paginate(numbers(25), 3), vec![21, 22, 23, 24, 25]);
        assert!(paginate(numbers(20), 3).is_empty());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        assert!(paginate(numbers(25), 0).is_empty());
        assert!(paginate(numbers(25), -4).is_empty());
        assert!(paginate(numbers(25), 999).is_empty());
        assert!(paginate(numbers(25), i64::MAX).is_empty());
        assert!(paginate(numbers(25), i64::MIN).is_empty());
    }
}
