//! Defines the core `Expense` record and the types used to create one.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::ExpenseId};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The category labels every store starts out with.
///
/// The set is informal: adding an expense under a label that is not listed
/// here grows the set, and deleting the last expense in a category does not
/// shrink it.
pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Education",
    "Travel",
    "Other",
];

/// Parse a date in the `YYYY-MM-DD` form used throughout the application.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date in
/// that form.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), &DATE_FORMAT).map_err(|_| Error::InvalidDate(text.trim().to_owned()))
}

/// The normalized name of an expense category.
///
/// Construction through [CategoryName::new] normalizes the label to title
/// case, so `"eating out"` and `"Eating Out"` name the same category.
/// Matching against raw user input stays case-insensitive on top of that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, normalizing it to title case.
    ///
    /// # Errors
    /// This function will return an error if `name` is empty or only
    /// whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(title_case(name)))
        }
    }

    /// Create a category name without validation or normalization.
    ///
    /// The caller should ensure that the string is non-empty and already in
    /// title case, e.g. because it was previously written by this
    /// application. Violating that invariant causes incorrect grouping but
    /// nothing worse, hence `_unchecked` rather than `unsafe`.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Whether `label` names this category, ignoring ASCII case.
    pub fn matches(&self, label: &str) -> bool {
        self.0.eq_ignore_ascii_case(label.trim())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title-case each whitespace-separated word, matching how category labels
/// are displayed in the web UI, the CLI, and exports.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A single dated monetary expense record.
///
/// To create a new `Expense`, use [Expense::build] and pass the builder to a
/// store, which assigns the ID. Records are immutable once created; there is
/// no update operation, only delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the store that created it.
    pub id: ExpenseId,
    /// When the money was spent.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// How much money was spent. Always greater than zero.
    pub amount: f64,
    /// The category the expense is filed under.
    pub category: CategoryName,
    /// A free-text description of what the money was spent on.
    pub description: String,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder::new] for discoverability.
    pub fn build(amount: f64, category: CategoryName) -> Result<ExpenseBuilder, Error> {
        ExpenseBuilder::new(amount, category)
    }
}

/// Builder for creating a new [Expense].
///
/// The builder is the single creation path: the amount is validated here, so
/// every front end (web form, CLI, CSV import) applies the same rule. Pass
/// the finished builder to a store to assign an ID and persist the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// How much money was spent.
    pub amount: f64,
    /// When the money was spent. Defaults to today.
    pub date: Date,
    /// The category the expense is filed under.
    pub category: CategoryName,
    /// A free-text description. Defaults to the empty string.
    pub description: String,
}

impl ExpenseBuilder {
    /// Start building an expense of `amount` filed under `category`.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `amount` is zero, negative, or
    /// not a number.
    pub fn new(amount: f64, category: CategoryName) -> Result<Self, Error> {
        if !(amount > 0.0) {
            return Err(Error::NonPositiveAmount);
        }

        Ok(Self {
            amount,
            date: OffsetDateTime::now_utc().date(),
            category,
            description: String::new(),
        })
    }

    /// Set the date for the expense.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }

    /// Set the description for the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Turn the builder into an [Expense] with the store-assigned `id`.
    pub fn finalise(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            date: self.date,
            amount: self.amount,
            category: self.category,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::Error;

    use super::CategoryName;

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(CategoryName::new(""), Err(Error::EmptyCategoryName));
        assert_eq!(CategoryName::new("   "), Err(Error::EmptyCategoryName));
    }

    #[test]
    fn new_normalizes_to_title_case() {
        let cases = [
            ("food", "Food"),
            ("FOOD", "Food"),
            ("eating out", "Eating Out"),
            ("  bills  ", "Bills"),
        ];

        for (input, want) in cases {
            let got = CategoryName::new(input).unwrap();
            assert_eq!(got.as_ref(), want, "CategoryName::new({input:?})");
        }
    }

    #[test]
    fn matches_ignores_case() {
        let category = CategoryName::new("Food").unwrap();

        assert!(category.matches("food"));
        assert!(category.matches("FOOD"));
        assert!(!category.matches("transport"));
    }
}
