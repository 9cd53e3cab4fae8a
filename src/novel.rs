// Novel record model and the normalization rules applied to raw console
// input before a record is built.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cover used when the user skips the cover image prompt.
pub const PLACEHOLDER_COVER: &str = "https://via.placeholder.com/300x400";

/// Source language of every uploaded novel.
pub const ORIGINAL_LANGUAGE: &str = "zh-CN";
/// Language the novel is translated into.
pub const TRANSLATED_LANGUAGE: &str = "en";

/// Number of description characters shown in the confirmation summary.
pub const PREVIEW_CHARS: usize = 100;

/// Genre tag. The declaration order is the order of the selection menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fantasy,
    Urban,
    Xianxia,
    Historical,
    Military,
    Gaming,
    Sports,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Supernatural,
    Fanfiction,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Fantasy,
        Category::Urban,
        Category::Xianxia,
        Category::Historical,
        Category::Military,
        Category::Gaming,
        Category::Sports,
        Category::SciFi,
        Category::Supernatural,
        Category::Fanfiction,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Fantasy => "Fantasy",
            Category::Urban => "Urban",
            Category::Xianxia => "Xianxia",
            Category::Historical => "Historical",
            Category::Military => "Military",
            Category::Gaming => "Gaming",
            Category::Sports => "Sports",
            Category::SciFi => "Sci-Fi",
            Category::Supernatural => "Supernatural",
            Category::Fanfiction => "Fanfiction",
        }
    }

    /// Map a 1-based menu choice to a category.
    ///
    /// Returns the category and whether the choice was unusable (not an
    /// integer, or outside the menu), in which case it is `Fantasy`.
    pub fn from_choice(input: &str) -> (Category, bool) {
        let picked = input
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| (1..=Self::ALL.len() as i64).contains(n))
            .map(|n| Self::ALL[(n - 1) as usize]);
        match picked {
            Some(category) => (category, false),
            None => (Category::Fantasy, true),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chapter counts and price. Counts are not range checked and free chapters
/// may exceed the total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub total_chapters: i64,
    pub free_chapters: i64,
    pub price: f64,
}

impl Pricing {
    /// Used for the whole block as soon as one of the three values fails to parse.
    pub const DEFAULT: Pricing = Pricing {
        total_chapters: 30,
        free_chapters: 8,
        price: 6.99,
    };
}

impl Default for Pricing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parse a chapter count. Any integer is accepted; a count the table column
/// cannot hold is left for the store to reject.
pub fn parse_count(input: &str) -> Option<i64> {
    input.trim().parse().ok()
}

/// Parse a price. Non-finite values such as `inf` or `NaN` are refused since
/// the table column cannot hold them.
pub fn parse_price(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Row shape of the `novels` table insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NovelRecord {
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: String,
    pub category: Category,
    pub original_language: &'static str,
    pub translated_language: &'static str,
    pub total_chapters: i64,
    pub free_chapters: i64,
    pub price: f64,
}

impl NovelRecord {
    pub fn new(
        title: String,
        author: String,
        description: String,
        category: Category,
        cover_image: String,
        pricing: Pricing,
    ) -> Self {
        NovelRecord {
            title,
            author,
            description,
            cover_image,
            category,
            original_language: ORIGINAL_LANGUAGE,
            translated_language: TRANSLATED_LANGUAGE,
            total_chapters: pricing.total_chapters,
            free_chapters: pricing.free_chapters,
            price: pricing.price,
        }
    }

    /// Lines printed before asking for confirmation.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Title: {}", self.title),
            format!("Author: {}", self.author),
            format!("Category: {}", self.category),
            format!("Cover: {}", self.cover_image),
            format!("Total chapters: {}", self.total_chapters),
            format!("Free chapters: {}", self.free_chapters),
            format!("Price: ${}", self.price),
            format!("Description: {}", description_preview(&self.description)),
        ]
    }
}

/// Empty (after trimming) input falls back to the placeholder; anything else
/// is kept verbatim with no URL checks.
pub fn cover_or_placeholder(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        PLACEHOLDER_COVER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// First [`PREVIEW_CHARS`] characters, with `...` appended only when
/// something was cut. Counts chars, not bytes.
pub fn description_preview(description: &str) -> String {
    match description.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

/// True only for `y` or `Y`. Surrounding whitespace and longer answers such
/// as `yes` count as no.
pub fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_menu_choice_maps_in_order() {
        for (i, expected) in Category::ALL.iter().enumerate() {
            let (category, fell_back) = Category::from_choice(&(i + 1).to_string());
            assert_eq!(category, *expected);
            assert!(!fell_back);
        }
        assert_eq!(Category::from_choice(" 3 ").0, Category::Xianxia);
    }

    #[test]
    fn bad_choices_fall_back_to_fantasy() {
        for input in ["0", "11", "-2", "abc", "", "3.0", "99999999999999999999"] {
            assert_eq!(Category::from_choice(input), (Category::Fantasy, true), "input {input:?}");
        }
    }

    #[test]
    fn sci_fi_serializes_with_hyphen() {
        assert_eq!(serde_json::to_value(Category::SciFi).unwrap(), "Sci-Fi");
        assert_eq!(Category::SciFi.to_string(), "Sci-Fi");
    }

    #[test]
    fn cover_skip_uses_placeholder() {
        assert_eq!(cover_or_placeholder(""), PLACEHOLDER_COVER);
        assert_eq!(cover_or_placeholder("   "), PLACEHOLDER_COVER);
        assert_eq!(cover_or_placeholder("not a url"), "not a url");
        assert_eq!(cover_or_placeholder("https://img/x.png"), "https://img/x.png");
    }

    #[test]
    fn preview_keeps_short_descriptions() {
        let exact = "a".repeat(100);
        assert_eq!(description_preview(&exact), exact);
        assert_eq!(description_preview("A hero rises."), "A hero rises.");
    }

    #[test]
    fn preview_cuts_long_descriptions_on_chars() {
        let long = "b".repeat(101);
        assert_eq!(description_preview(&long), format!("{}...", "b".repeat(100)));

        let cjk = "龙".repeat(150);
        let preview = description_preview(&cjk);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn only_single_y_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes("Y"));
        for answer in ["yes", "Y ", " y", "", "n", "ye"] {
            assert!(!is_yes(answer), "answer {answer:?}");
        }
    }

    #[test]
    fn numbers_parse_loosely() {
        assert_eq!(parse_count(" 50 "), Some(50));
        assert_eq!(parse_count("-4"), Some(-4));
        assert_eq!(parse_count("4.5"), None);
        assert_eq!(parse_count("3000000000"), Some(3_000_000_000));
        assert_eq!(parse_price("4.99"), Some(4.99));
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn record_serializes_to_table_columns() {
        let record = NovelRecord::new(
            "Dragon's Path".into(),
            "Wei Chen".into(),
            "A hero rises.".into(),
            Category::Xianxia,
            PLACEHOLDER_COVER.into(),
            Pricing {
                total_chapters: 50,
                free_chapters: 10,
                price: 4.99,
            },
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "Dragon's Path",
                "author": "Wei Chen",
                "description": "A hero rises.",
                "cover_image": PLACEHOLDER_COVER,
                "category": "Xianxia",
                "original_language": "zh-CN",
                "translated_language": "en",
                "total_chapters": 50,
                "free_chapters": 10,
                "price": 4.99
            })
        );
    }

    #[test]
    fn summary_truncates_but_record_keeps_full_text() {
        let long = "x".repeat(120);
        let record = NovelRecord::new(
            "t".into(),
            "a".into(),
            long.clone(),
            Category::Urban,
            PLACEHOLDER_COVER.into(),
            Pricing::DEFAULT,
        );
        let last = record.summary_lines().pop().unwrap();
        assert!(last.ends_with("..."));
        assert_eq!(record.description, long);
        assert!(record.summary_lines().contains(&"Price: $6.99".to_string()));
    }

    #[test]
    fn summary_shows_price_exactly_as_submitted() {
        let price = parse_price("0.004").unwrap();
        let record = NovelRecord::new(
            "t".into(),
            "a".into(),
            "d".into(),
            Category::Urban,
            PLACEHOLDER_COVER.into(),
            Pricing {
                total_chapters: 1,
                free_chapters: 1,
                price,
            },
        );
        assert!(record.summary_lines().contains(&"Price: $0.004".to_string()));
        assert_eq!(record.price, 0.004);
    }
}
