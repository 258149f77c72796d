/*
[INPUT]:  None (static lesson content)
[OUTPUT]: "objects" lesson - shared behaviour over records, Book / Magazine records, compare_age
[POS]:    Lesson catalog entry
[UPDATE]: When changing the objects lesson content
*/

use std::time::Duration;

use super::{Lesson, epilogue, prologue};
use crate::error::StepError;
use crate::log::Severity::{Info, Success, System};
use crate::task::{Script, Step, Task, TaskBuilder};

const INTERLUDE_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub brand: &'static str,
    pub model: &'static str,
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: &'static str,
    pub author: &'static str,
    pub year: u16,
}

/// A book-like record that also carries the issue month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Magazine {
    pub book: Book,
    pub month: &'static str,
}

pub fn describe_car(car: &Car) -> String {
    format!("{} {}, built in {}.", car.brand, car.model, car.year)
}

pub fn book_summary(book: &Book) -> String {
    format!("\"{}\" was written by {} in {}", book.title, book.author, book.year)
}

pub fn magazine_summary(magazine: &Magazine) -> String {
    let book = &magazine.book;
    format!(
        "\"{}\" was written by {} in {} {}",
        book.title, book.author, magazine.month, book.year
    )
}

pub fn compare_age(first: &Book, second: &Book) -> String {
    use std::cmp::Ordering;

    match first.year.cmp(&second.year) {
        Ordering::Less => format!(
            "\"{}\" was published before \"{}\"",
            first.title, second.title
        ),
        Ordering::Greater => format!(
            "\"{}\" was published before \"{}\"",
            second.title, first.title
        ),
        Ordering::Equal => format!(
            "\"{}\" and \"{}\" were published in the same year",
            first.title, second.title
        ),
    }
}

const SHELF: &[(&str, Book)] = &[
    ("old", Book { title: "Old book", author: "Author 1", year: 1900 }),
    ("new", Book { title: "New book", author: "Author 2", year: 2020 }),
    ("same_a", Book { title: "Book A", author: "Author 3", year: 2000 }),
    ("same_b", Book { title: "Book B", author: "Author 4", year: 2000 }),
];

/// Look a demonstration book up by its variable name.
pub fn shelf_book(name: &str) -> Result<&'static Book, StepError> {
    SHELF
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, book)| book)
        .ok_or_else(|| StepError::new(format!("{name} is not defined")))
}

pub fn lesson() -> Lesson {
    let script = Script::new(vec![
        with_interlude(context_task(), "Preparing the next task..."),
        with_interlude(book_task(), "Loading the next task..."),
        with_interlude(magazine_task(), "Moving on to the next task..."),
        compare_age_task().build(),
    ])
    .with_prologue({
        let mut steps = prologue(&[
            ("Starting the practical tasks...", System, 800),
            ("Initializing the system...", Info, 600),
            ("Creating records...", Success, 400),
            ("Preparing values...", Success, 400),
            ("Wiring up functions...", Success, 400),
            ("Everything is ready", Success, 400),
        ]);
        steps.push(Step::group_header(
            "PRACTICAL TASKS: OBJECTS AND RECORDS",
            Duration::from_millis(500),
        ));
        steps
    })
    .with_epilogue(epilogue(
        "ALL TASKS COMPLETED SUCCESSFULLY!",
        &[
            "✓ Task 1: car record with describe_car()",
            "✓ Task 2.1: Book record with book_summary()",
            "✓ Task 2.2: Magazine record wrapping a Book",
            "✓ Task 2.3: compare_age() over two books",
        ],
    ));

    Lesson {
        id: "objects",
        title: "Objects and records",
        summary: "Shared functions over records, composition instead of inheritance, comparisons",
        script,
        bonus: None,
    }
}

fn with_interlude(builder: TaskBuilder, text: &str) -> Task {
    builder.line(text, Info, INTERLUDE_MS).build()
}

fn context_task() -> TaskBuilder {
    let car = Car { brand: "Toyota", model: "Camry", year: 2022 };
    let car2 = Car { brand: "BMW", model: "X5", year: 2020 };
    let car3 = Car { brand: "Lada", model: "Vesta", year: 2023 };

    Task::builder("Object context")
        .line("Task 1: Functions working on a record", System, 0)
        .line("Created the car record:", Info, 300)
        .code(
            "let car = Car { brand: \"Toyota\", model: \"Camry\", year: 2022 };\n\nfn describe_car(car: &Car) -> String {\n    format!(\"{} {}, built in {}.\", car.brand, car.model, car.year)\n}",
            400,
        )
        .line("Testing describe_car():", Info, 400)
        .compute(Success, 300, move || Ok(format!("Result: {}", describe_car(&car))))
        .line("Creating more records:", Info, 400)
        .compute(Info, 200, move || Ok(format!("car2: {}", describe_car(&car2))))
        .compute(Info, 200, move || Ok(format!("car3: {}", describe_car(&car3))))
        .line("The same function describes whichever record it is given", Success, 400)
}

fn book_task() -> TaskBuilder {
    let books = [
        Book { title: "War and Peace", author: "Leo Tolstoy", year: 1869 },
        Book { title: "1984", author: "George Orwell", year: 1949 },
        Book { title: "The Master and Margarita", author: "Mikhail Bulgakov", year: 1967 },
    ];

    let mut task = Task::builder("Book record")
        .separator("~", 500)
        .line("Task 2.1: The Book record", System, 0)
        .line("Created the Book record:", Info, 300)
        .code(
            "struct Book {\n    title: &'static str,\n    author: &'static str,\n    year: u16,\n}\n\nfn book_summary(book: &Book) -> String {\n    format!(\"\\\"{}\\\" was written by {} in {}\", book.title, book.author, book.year)\n}",
            400,
        )
        .line("Creating Book values:", Info, 400);

    for (index, book) in books.into_iter().enumerate() {
        task = task.compute(Info, 200, move || {
            Ok(format!("book{}: {}", index + 1, book_summary(&book)))
        });
    }

    task.line("The Book record works", Success, 400)
}

fn magazine_task() -> TaskBuilder {
    let magazines = [
        Magazine {
            book: Book { title: "Science and Life", author: "The editors", year: 2023 },
            month: "October",
        },
        Magazine {
            book: Book { title: "Forbes", author: "Forbes Media", year: 2024 },
            month: "January",
        },
    ];

    let mut task = Task::builder("Magazine record")
        .separator("~", 500)
        .line("Task 2.2: Composing records", System, 0)
        .line("Created the Magazine record, which wraps a Book:", Info, 300)
        .code(
            "struct Magazine {\n    book: Book,\n    month: &'static str,\n}\n\nfn magazine_summary(magazine: &Magazine) -> String {\n    let book = &magazine.book;\n    format!(\"\\\"{}\\\" was written by {} in {} {}\", book.title, book.author, magazine.month, book.year)\n}",
            400,
        )
        .line("Creating Magazine values:", Info, 400);

    for (index, magazine) in magazines.iter().cloned().enumerate() {
        task = task.compute(Info, 200, move || {
            Ok(format!("magazine{}: {}", index + 1, magazine_summary(&magazine)))
        });
    }

    let first = magazines[0].clone();
    task.line("Checking the composition:", Info, 400)
        .compute(Success, 200, move || {
            Ok(format!(
                "magazine1 contains a Book: {}",
                book_summary(&first.book)
            ))
        })
        .line("magazine_summary() adds the month to the book summary", Success, 400)
}

fn compare_age_task() -> TaskBuilder {
    Task::builder("compare_age")
        .separator("~", 500)
        .line("Task 2.3: Comparing books with compare_age", System, 0)
        .line("Added the free function compare_age:", Info, 300)
        .code(
            "fn compare_age(first: &Book, second: &Book) -> String {\n    match first.year.cmp(&second.year) {\n        Ordering::Less => format!(\"\\\"{}\\\" was published before \\\"{}\\\"\", first.title, second.title),\n        Ordering::Greater => format!(\"\\\"{}\\\" was published before \\\"{}\\\"\", second.title, first.title),\n        Ordering::Equal => format!(\"\\\"{}\\\" and \\\"{}\\\" were published in the same year\", first.title, second.title),\n    }\n}",
            400,
        )
        .line("Testing the function:", Info, 400)
        .line("Comparing books from different years:", Info, 200)
        .line("compare_age(&old, &new):", Info, 200)
        .compute(Success, 300, || {
            Ok(format!(
                "Result: {}",
                compare_age(shelf_book("old")?, shelf_book("new")?)
            ))
        })
        .line("Comparing books from the same year:", Info, 200)
        .line("compare_age(&same_a, &same_b):", Info, 200)
        .compute(Success, 300, || {
            Ok(format!(
                "Result: {}",
                compare_age(shelf_book("same_a")?, shelf_book("same_b")?)
            ))
        })
        .line("compare_age needs no instance, only two books", Success, 400)
}
