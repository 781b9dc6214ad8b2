//! CSV export and import for expense records.
//!
//! The export writes a `date,amount,category,description` header followed by
//! one row per record. The import accepts that format as well as the
//! capitalized header variant (`Date,Amount,Category,Description`) that
//! older exports used. Imported rows go back through [ExpenseBuilder], so
//! IDs are reassigned by the store and amount validation reapplies.

use std::io::{Read, Write};

use time::Date;

use crate::{
    Error,
    expense::{CategoryName, Expense, ExpenseBuilder, parse_date},
};

const HEADERS: [&str; 4] = ["date", "amount", "category", "description"];

/// Write `expenses` as CSV to `writer`, header first.
///
/// # Errors
/// Returns an [Error::FileError] if the underlying writer fails.
pub fn write_csv<W: Write>(expenses: &[Expense], writer: W) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);

    writer
        .write_record(HEADERS)
        .map_err(|error| Error::FileError(error.to_string()))?;

    for expense in expenses {
        writer
            .write_record([
                &expense.date.to_string(),
                &expense.amount.to_string(),
                expense.category.as_ref(),
                &expense.description,
            ])
            .map_err(|error| Error::FileError(error.to_string()))?;
    }

    writer
        .flush()
        .map_err(|error| Error::FileError(error.to_string()))
}

/// Read expense builders from CSV data previously produced by [write_csv]
/// (or its capitalized-header variant).
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCsv] if a required column is missing or a row cannot be
///   parsed,
/// - [Error::InvalidDate] if a date is not in `YYYY-MM-DD` form,
/// - [Error::NonPositiveAmount] if a row holds a zero or negative amount,
/// - or [Error::EmptyCategoryName] if a row has an empty category.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ExpenseBuilder>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::InvalidCsv(format!("missing column \"{name}\"")))
    };

    let date_column = column("date")?;
    let amount_column = column("amount")?;
    let category_column = column("category")?;
    let description_column = column("description")?;

    let mut builders = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header, so data rows start at line 2.
        let line_number = index + 2;
        let record =
            record.map_err(|error| Error::InvalidCsv(format!("line {line_number}: {error}")))?;
        let field = |index: usize| record.get(index).unwrap_or("");

        let date = parse_date(field(date_column))?;
        let amount: f64 = field(amount_column).parse().map_err(|_| {
            Error::InvalidCsv(format!(
                "line {line_number}: could not parse amount \"{}\"",
                field(amount_column)
            ))
        })?;
        let category = CategoryName::new(field(category_column))?;

        let builder = ExpenseBuilder::new(amount, category)?
            .date(date)
            .description(field(description_column));

        builders.push(builder);
    }

    Ok(builders)
}

/// The default file name for a CSV export made on `date`, e.g.
/// `expenses_export_20251024.csv`.
pub fn export_file_name(date: Date) -> String {
    format!(
        "expenses_export_{:04}{:02}{:02}.csv",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::{CategoryName, Expense},
    };

    use super::{export_file_name, read_csv, write_csv};

    fn sample_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                date: date!(2025 - 10 - 22),
                amount: 4.50,
                category: CategoryName::new_unchecked("Food"),
                description: "Morning coffee".to_owned(),
            },
            Expense {
                id: 2,
                date: date!(2025 - 10 - 20),
                amount: 12.75,
                category: CategoryName::new_unchecked("Food"),
                description: "Lunch, with a side of fries".to_owned(),
            },
        ]
    }

    #[test]
    fn write_csv_starts_with_the_expected_header() {
        let mut buffer = Vec::new();

        write_csv(&sample_expenses(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, "date,amount,category,description");
    }

    #[test]
    fn round_trip_preserves_every_field_but_the_id() {
        let expenses = sample_expenses();
        let mut buffer = Vec::new();
        write_csv(&expenses, &mut buffer).unwrap();

        let builders = read_csv(buffer.as_slice()).unwrap();

        assert_eq!(builders.len(), expenses.len());
        for (builder, expense) in builders.iter().zip(&expenses) {
            assert_eq!(builder.date, expense.date);
            assert_eq!(builder.amount, expense.amount);
            assert_eq!(builder.category, expense.category);
            assert_eq!(builder.description, expense.description);
        }
    }

    #[test]
    fn read_csv_accepts_capitalized_headers() {
        let text = "Date,Amount,Category,Description\n2025-10-22,4.5,Food,Morning coffee\n";

        let builders = read_csv(text.as_bytes()).unwrap();

        assert_eq!(builders.len(), 1);
        assert_eq!(builders[0].date, date!(2025 - 10 - 22));
        assert_eq!(builders[0].amount, 4.5);
    }

    #[test]
    fn read_csv_fails_on_missing_column() {
        let text = "date,amount,category\n2025-10-22,4.5,Food\n";

        let result = read_csv(text.as_bytes());

        assert_eq!(
            result,
            Err(Error::InvalidCsv("missing column \"description\"".to_owned()))
        );
    }

    #[test]
    fn read_csv_fails_on_unparseable_amount() {
        let text = "date,amount,category,description\n2025-10-22,four fifty,Food,Coffee\n";

        let result = read_csv(text.as_bytes());

        assert_eq!(
            result,
            Err(Error::InvalidCsv(
                "line 2: could not parse amount \"four fifty\"".to_owned()
            ))
        );
    }

    #[test]
    fn read_csv_rejects_non_positive_amounts() {
        let text = "date,amount,category,description\n2025-10-22,-4.5,Food,Coffee\n";

        let result = read_csv(text.as_bytes());

        assert_eq!(result, Err(Error::NonPositiveAmount));
    }

    #[test]
    fn export_file_name_is_date_stamped() {
        assert_eq!(
            export_file_name(date!(2025 - 10 - 24)),
            "expenses_export_20251024.csv"
        );
    }
}
