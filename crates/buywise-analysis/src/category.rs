//! Keyword classification of product titles.

/// Label returned when no category keyword appears in the title.
pub const OTHER_CATEGORY: &str = "other";

/// Categories in tie-break order, each with the title words that vote for it.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "smartphone",
        &[
            "smartphone", "phone", "iphone", "android", "samsung", "pixel", "galaxy", "mobile",
            "unlocked",
        ],
    ),
    (
        "laptop",
        &[
            "laptop", "notebook", "macbook", "thinkpad", "chromebook", "computer", "ultrabook",
        ],
    ),
    (
        "headphones",
        &[
            "headphones", "headphone", "earphones", "earbuds", "headset", "airpods", "wireless",
        ],
    ),
    (
        "television",
        &["tv", "television", "led", "lcd", "oled", "qled", "smart", "4k"],
    ),
    (
        "camera",
        &["camera", "dslr", "mirrorless", "photography", "canon", "nikon", "sony", "lens"],
    ),
    (
        "clothing",
        &[
            "clothing", "apparel", "shirt", "jeans", "pants", "dress", "jacket", "hoodie",
            "sweater",
        ],
    ),
    (
        "shoes",
        &["shoes", "shoe", "footwear", "sneakers", "boots", "sandals"],
    ),
];

/// Category whose keywords appear most often among the words of `title`,
/// or [`OTHER_CATEGORY`] when none do.
#[must_use]
pub fn classify_product(title: &str) -> &'static str {
    let title = title.to_lowercase();
    let words: Vec<&str> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let mut best = (OTHER_CATEGORY, 0);
    for &(category, keywords) in CATEGORIES {
        let hits = words.iter().filter(|w| keywords.contains(w)).count();
        if hits > best.1 {
            best = (category, hits);
        }
    }
    best.0
}
