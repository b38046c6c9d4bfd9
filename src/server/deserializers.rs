use serde::{Deserialize, Deserializer};

pub const FIRST_PAGE: i64 = 1;

pub fn first_page() -> i64 {
    FIRST_PAGE
}

// `?page=abc` is served as the first page instead of being rejected
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(FIRST_PAGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PageOnly {
        #[serde(default = "first_page", deserialize_with = "deserialize_page")]
        page: i64,
    }

    fn page_of(query: &str) -> i64 {
        serde_json::from_str::<PageOnly>(query).unwrap().page
    }

    #[test]
    fn parses_numeric_pages() {
        assert_eq!(page_of(r#"{"page": "3"}"#), 3);
        assert_eq!(page_of(r#"{"page": "-2"}"#), -2);
    }

    #[test]
    fn falls_back_to_first_page() {
        assert_eq!(page_of(r#"{}"#), 1);
        assert_eq!(page_of(r#"{"page": "abc"}"#), 1);
        assert_eq!(page_of(r#"{"page": null}"#), 1);
    }
}
