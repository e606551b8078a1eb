//! Rule-based expense categorization
//!
//! A fixed, priority-ordered keyword table maps a free-text description to
//! one of the ten [`Category`] labels. Matching is case-insensitive
//! substring containment; the first rule with any matching keyword wins and
//! later rules are never consulted. Categories are therefore mutually
//! exclusive outputs even when a description mentions keywords from several
//! rules ("hospital taxi" is Medical, not Transportation).
//!
//! The function is pure and total: any input, including the empty string,
//! resolves to a label, defaulting to [`Category::Others`].

use crate::types::Category;

/// The classification rules, evaluated top to bottom.
///
/// Rule order is significant; keyword order within a rule is not.
const RULES: &[(&[&str], Category)] = &[
    (
        &["pharmacy", "medical", "doctor", "hospital", "medicine"],
        Category::Medical,
    ),
    (
        &["fruit", "vegetables", "big bazaar", "grocery"],
        Category::Groceries,
    ),
    (
        &["netflix", "youtube", "book", "headphones", "udemy"],
        Category::SubscriptionsBooks,
    ),
    (
        &["train", "taxi", "ola", "uber", "auto", "bus", "rapido", "rickshaw"],
        Category::Transportation,
    ),
    (
        &[
            "lunch", "dinner", "snack", "zomato", "starbucks", "ice cream", "mcdonald", "pizza",
        ],
        Category::FoodDining,
    ),
    (&["petrol", "diesel", "cng"], Category::Fuel),
    (&["rent"], Category::Rent),
    (&["recharge"], Category::MobileRecharge),
    (
        &["myntra", "jeans", "t-shirt", "h&m", "shirt", "clothing"],
        Category::Clothing,
    ),
];

/// Classify a description into a spending category.
pub fn categorize(description: &str) -> Category {
    let desc = description.to_lowercase();

    for (keywords, category) in RULES {
        if keywords.iter().any(|k| desc.contains(k)) {
            return *category;
        }
    }

    Category::Others
}
