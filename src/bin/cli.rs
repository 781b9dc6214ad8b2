use std::{
    fs::File,
    path::{Path, PathBuf},
    process::exit,
};

use clap::{Parser, Subcommand};
use time::{Date, Month, OffsetDateTime};

use spendlog::{
    Error, ExpenseId,
    csv::{export_file_name, read_csv, write_csv},
    expense::{CategoryName, Expense, ExpenseBuilder, parse_date},
    report::{report_document, report_file_name},
    stores::{ExpenseQuery, ExpenseStore, JsonExpenseStore, SortOrder, SqliteExpenseStore},
    summary::{category_percentages, monthly_total, spending_summary, total_spending},
};

/// The command-line interface for spendlog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a SQLite database to store expenses in.
    ///
    /// When omitted, expenses are stored in the JSON file given by
    /// --data-file.
    #[arg(long, conflicts_with = "data_file")]
    db_path: Option<PathBuf>,

    /// File path to the JSON expense file.
    #[arg(long, default_value = "expenses.json")]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense.
    Add {
        /// How much money was spent.
        #[arg(long)]
        amount: f64,
        /// The category to file the expense under, e.g. 'Food'.
        #[arg(long)]
        category: String,
        /// What the money was spent on.
        #[arg(long)]
        description: String,
        /// The date in YYYY-MM-DD form. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// List expenses, newest first.
    List {
        /// Show only expenses filed under this category.
        #[arg(long)]
        category: Option<String>,
        /// Show only expenses on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Show only expenses on or before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
    },
    /// Show the read-only spending overview.
    Overview,
    /// Show the total for one calendar month.
    Summary {
        /// The year, e.g. 2025.
        #[arg(long)]
        year: i32,
        /// The month number, 1 through 12.
        #[arg(long)]
        month: u8,
    },
    /// Break down spending by category.
    Analysis,
    /// Export all expenses to a CSV file.
    Export {
        /// Where to write the CSV. Defaults to a date-stamped name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import expenses from a CSV file.
    Import {
        /// The CSV file to read.
        #[arg(long)]
        input: PathBuf,
    },
    /// Write the standalone HTML report.
    Report {
        /// Where to write the report. Defaults to a date-stamped name.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete the expense with the given ID.
    Delete {
        /// The ID of the expense, as shown by `list`.
        #[arg(long)]
        id: ExpenseId,
    },
}

fn main() {
    let args = Args::parse();

    let result = match &args.db_path {
        Some(db_path) => match SqliteExpenseStore::open(db_path) {
            Ok(mut store) => run(&mut store, args.command),
            Err(error) => Err(error),
        },
        None => match JsonExpenseStore::open(&args.data_file) {
            Ok(mut store) => run(&mut store, args.command),
            Err(error) => Err(error),
        },
    };

    if let Err(error) = result {
        eprintln!("Error: {error}");
        exit(1);
    }
}

fn run<S: ExpenseStore>(store: &mut S, command: Command) -> Result<(), Error> {
    match command {
        Command::Add {
            amount,
            category,
            description,
            date,
        } => add(store, amount, &category, &description, date.as_deref()),
        Command::List { category, from, to } => {
            list(store, category.as_deref(), from.as_deref(), to.as_deref())
        }
        Command::Overview => overview(store),
        Command::Summary { year, month } => summary(store, year, month),
        Command::Analysis => analysis(store),
        Command::Export { output } => export(store, output),
        Command::Import { input } => import(store, &input),
        Command::Report { output } => report(store, output),
        Command::Delete { id } => delete(store, id),
    }
}

fn add<S: ExpenseStore>(
    store: &mut S,
    amount: f64,
    category: &str,
    description: &str,
    date: Option<&str>,
) -> Result<(), Error> {
    let mut builder = ExpenseBuilder::new(amount, CategoryName::new(category)?)?
        .description(description);

    if let Some(date) = date {
        builder = builder.date(parse_date(date)?);
    }

    let expense = store.create(builder)?;
    println!(
        "Added expense #{}: ${:.2} for {}",
        expense.id, expense.amount, expense.category
    );

    Ok(())
}

fn list<S: ExpenseStore>(
    store: &S,
    category: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(), Error> {
    let date_range = match (from, to) {
        (Some(from), Some(to)) => Some(parse_date(from)?..=parse_date(to)?),
        (Some(from), None) => Some(parse_date(from)?..=Date::MAX),
        (None, Some(to)) => Some(Date::MIN..=parse_date(to)?),
        (None, None) => None,
    };

    let query = ExpenseQuery {
        category: category.map(CategoryName::new).transpose()?,
        date_range,
        sort_date: Some(SortOrder::Descending),
        limit: None,
    };

    print_expense_table(&store.get_query(query)?);

    Ok(())
}

fn overview<S: ExpenseStore>(store: &S) -> Result<(), Error> {
    let expenses = store.get_query(ExpenseQuery::newest_first())?;
    let summary = spending_summary(&expenses);

    let date_range = match (summary.earliest, summary.latest) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "N/A".to_owned(),
    };

    println!("Expense Summary");
    println!("---------------");
    println!("Total expenses: {}", summary.count);
    println!("Total amount:   ${:.2}", summary.total);
    println!("Average:        ${:.2}", summary.average);
    println!("Date range:     {date_range}");

    if !expenses.is_empty() {
        println!();
        println!("By category:");
        for row in category_percentages(&expenses) {
            println!(
                "  {:<15} ${:<9.2} ({:.1}%)",
                row.category.as_ref(),
                row.total,
                row.percentage
            );
        }

        println!();
        println!("Recent expenses:");
        print_expense_table(&expenses[..expenses.len().min(10)]);
    }

    Ok(())
}

fn summary<S: ExpenseStore>(store: &S, year: i32, month: u8) -> Result<(), Error> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

    let expenses = store.get_query(ExpenseQuery::default())?;
    let total = monthly_total(&expenses, year, month);

    println!("{month} {year} total: ${total:.2}");

    let first_day = Date::from_calendar_date(year, month, 1)
        .map_err(|_| Error::InvalidDate(format!("{year}-{month}")))?;
    let last_day = Date::from_calendar_date(
        year,
        month,
        time::util::days_in_year_month(year, month),
    )
    .map_err(|_| Error::InvalidDate(format!("{year}-{month}")))?;

    let monthly_expenses = store.get_query(ExpenseQuery {
        date_range: Some(first_day..=last_day),
        sort_date: Some(SortOrder::Descending),
        ..Default::default()
    })?;

    if !monthly_expenses.is_empty() {
        println!();
        print_expense_table(&monthly_expenses);
    }

    Ok(())
}

fn analysis<S: ExpenseStore>(store: &S) -> Result<(), Error> {
    let expenses = store.get_query(ExpenseQuery::default())?;

    if expenses.is_empty() {
        println!("No expenses recorded yet!");
        return Ok(());
    }

    println!("{:<15} {:<10} {:<10}", "Category", "Amount", "Percentage");
    println!("{}", "-".repeat(40));

    for row in category_percentages(&expenses) {
        println!(
            "{:<15} ${:<9.2} {:<9.1}%",
            row.category.as_ref(),
            row.total,
            row.percentage
        );
    }

    println!("{}", "-".repeat(40));
    println!(
        "{:<15} ${:<9.2} {:<10}",
        "TOTAL",
        total_spending(&expenses),
        "100.0%"
    );

    Ok(())
}

fn export<S: ExpenseStore>(store: &S, output: Option<PathBuf>) -> Result<(), Error> {
    let expenses = store.get_query(ExpenseQuery::newest_first())?;

    let path = output
        .unwrap_or_else(|| PathBuf::from(export_file_name(OffsetDateTime::now_utc().date())));
    let file = File::create(&path)
        .map_err(|error| Error::FileError(format!("could not create {}: {error}", path.display())))?;

    write_csv(&expenses, file)?;
    println!("Exported {} expenses to {}", expenses.len(), path.display());

    Ok(())
}

fn import<S: ExpenseStore>(store: &mut S, input: &Path) -> Result<(), Error> {
    let file = File::open(input)
        .map_err(|error| Error::FileError(format!("could not open {}: {error}", input.display())))?;

    let builders = read_csv(file)?;
    let imported = store.import(builders)?;
    println!("Imported {} expenses from {}", imported.len(), input.display());

    Ok(())
}

fn report<S: ExpenseStore>(store: &S, output: Option<PathBuf>) -> Result<(), Error> {
    let expenses = store.get_query(ExpenseQuery::newest_first())?;
    let today = OffsetDateTime::now_utc().date();

    let path = output.unwrap_or_else(|| PathBuf::from(report_file_name(today)));
    let document = report_document(&expenses, today);

    std::fs::write(&path, document.into_string())
        .map_err(|error| Error::FileError(format!("could not write {}: {error}", path.display())))?;

    println!(
        "Wrote a report covering {} expenses to {}",
        expenses.len(),
        path.display()
    );

    Ok(())
}

fn delete<S: ExpenseStore>(store: &mut S, id: ExpenseId) -> Result<(), Error> {
    let expense = store.get(id)?;
    store.delete(id)?;

    println!("Deleted expense: {}", expense.description);

    Ok(())
}

fn print_expense_table(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses to display.");
        return;
    }

    println!(
        "{:<6} {:<12} {:<9} {:<15} {}",
        "ID", "Date", "Amount", "Category", "Description"
    );
    println!("{}", "-".repeat(70));

    for expense in expenses {
        println!(
            "{:<6} {} | ${:>6.2} | {:<15} | {}",
            expense.id,
            expense.date,
            expense.amount,
            expense.category.as_ref(),
            expense.description
        );
    }

    println!("{}", "-".repeat(70));
    println!("Total: ${:.2}", total_spending(expenses));
}
