use std::{collections::BTreeMap, error::Error, path::Path, process::exit};

use clap::Parser;

use spendlog::{
    expense::{CategoryName, ExpenseBuilder, parse_date},
    stores::{ExpenseStore, JsonExpenseStore, SqliteExpenseStore},
};

/// A utility for creating a demo expense store for trying out spendlog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the store to. A '.json' extension selects the JSON
    /// file backend, anything else (e.g. '.db') selects SQLite.
    #[arg(long, short)]
    output_path: String,
}

/// Amount, category, description, and date for each demo expense.
const SAMPLE_EXPENSES: [(f64, &str, &str, &str); 23] = [
    (4.50, "Food", "Morning coffee at local cafe", "2025-10-22"),
    (12.75, "Food", "Lunch at downtown restaurant", "2025-10-20"),
    (8.25, "Food", "Pizza delivery for dinner", "2025-10-18"),
    (15.60, "Food", "Brunch with friends", "2025-10-19"),
    (67.89, "Shopping", "Weekly groceries at supermarket", "2025-10-21"),
    (45.99, "Shopping", "New book and stationery supplies", "2025-10-17"),
    (89.50, "Shopping", "Winter jacket from clothing store", "2025-10-16"),
    (23.75, "Shopping", "Household cleaning supplies", "2025-10-23"),
    (15.00, "Transport", "Bus fare for city center trip", "2025-10-24"),
    (35.60, "Transport", "Taxi ride to airport", "2025-10-15"),
    (25.00, "Transport", "Weekly metro pass", "2025-10-14"),
    (42.30, "Transport", "Uber rides (3 trips)", "2025-10-20"),
    (18.50, "Entertainment", "Movie tickets for evening show", "2025-10-19"),
    (32.00, "Entertainment", "Concert tickets", "2025-10-13"),
    (12.99, "Entertainment", "Streaming service subscription", "2025-10-01"),
    (28.75, "Entertainment", "Bowling night with colleagues", "2025-10-22"),
    (125.00, "Bills", "Monthly electricity bill", "2025-10-05"),
    (85.50, "Bills", "Internet and cable package", "2025-10-03"),
    (45.00, "Bills", "Mobile phone bill", "2025-10-07"),
    (95.75, "Bills", "Water and gas utilities", "2025-10-10"),
    (75.00, "Healthcare", "Doctor consultation", "2025-10-12"),
    (24.95, "Healthcare", "Prescription medication", "2025-10-13"),
    (120.00, "Healthcare", "Dental cleaning appointment", "2025-10-08"),
];

/// Create and populate an expense store for manual testing and demos.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!(
                "Output path must include a file extension (e.g., 'demo.db' or 'demo.json')."
            );
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!(
                "Output path must include a file extension (e.g., 'demo.db' or 'demo.json')."
            );
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating demo store at {output_path:#?}");

    if output_path.extension().is_some_and(|ext| ext == "json") {
        let mut store = JsonExpenseStore::open(output_path)?;
        seed(&mut store)?;
    } else {
        let mut store = SqliteExpenseStore::open(output_path)?;
        seed(&mut store)?;
    }

    println!("Success!");

    Ok(())
}

fn seed<S: ExpenseStore>(store: &mut S) -> Result<(), Box<dyn Error>> {
    let mut builders = Vec::with_capacity(SAMPLE_EXPENSES.len());

    for (amount, category, description, date) in SAMPLE_EXPENSES {
        builders.push(
            ExpenseBuilder::new(amount, CategoryName::new(category)?)?
                .date(parse_date(date)?)
                .description(description),
        );
    }

    let imported = store.import(builders)?;
    println!("Added {} sample expenses", imported.len());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for expense in &imported {
        *counts.entry(expense.category.as_ref()).or_insert(0) += 1;
    }

    println!("Sample data breakdown:");
    for (category, count) in counts {
        println!("  - {category}: {count} expenses");
    }

    Ok(())
}
