/*
[INPUT]:  None (static lesson content)
[OUTPUT]: "arrays" lesson - filter, while-loop countdown, map, numbering, threshold filter
[POS]:    Lesson catalog entry
[UPDATE]: When changing the arrays lesson content
*/

use std::time::Duration;

use super::{Lesson, bracketed, epilogue, joined, prologue};
use crate::log::Severity::{self, Error, Info, Success, System, Warning};
use crate::task::{Script, Step, Task, TaskBuilder};

const INTERLUDE_MS: u64 = 5000;

pub fn lesson() -> Lesson {
    let script = Script::new(vec![
        with_interlude(filter_even_task(), "Preparing the next task..."),
        with_interlude(countdown_task(), "Loading the next task..."),
        with_interlude(word_lengths_task(), "Moving on to the next task..."),
        with_interlude(numbered_strings_task(), "Preparing the final task..."),
        filter_greater_task().build(),
    ])
    .with_prologue({
        let mut steps = prologue(&[
            ("Starting the practical tasks...", System, 800),
            ("Initializing the system...", Info, 600),
            ("Loading arrays...", Success, 400),
            ("Preparing loops...", Success, 400),
            ("Setting up functions...", Success, 400),
            ("Everything is ready", Success, 400),
        ]);
        steps.push(Step::group_header(
            "PRACTICAL TASKS: ARRAYS AND LOOPS",
            Duration::from_millis(500),
        ));
        steps
    })
    .with_epilogue(epilogue("All 5 tasks completed successfully", &[]));

    Lesson {
        id: "arrays",
        title: "Arrays and loops",
        summary: "filter, map, enumerate-based numbering and a while-loop countdown",
        script,
        bonus: None,
    }
}

fn with_interlude(builder: TaskBuilder, text: &str) -> Task {
    builder.line(text, Info, INTERLUDE_MS).build()
}

pub fn filter_even_numbers(numbers: &[i64]) -> Vec<i64> {
    numbers.iter().copied().filter(|n| n % 2 == 0).collect()
}

/// Numbers from `n` down to 1; `n` must be a positive integer.
pub fn countdown_from(n: f64) -> Result<Vec<u64>, String> {
    if n <= 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err("n must be a positive integer".to_string());
    }
    let mut result = Vec::new();
    let mut current = n as u64;
    while current >= 1 {
        result.push(current);
        current -= 1;
    }
    Ok(result)
}

pub fn word_lengths(words: &[&str]) -> Vec<usize> {
    words.iter().map(|word| word.chars().count()).collect()
}

pub fn numbered_strings(strings: &[&str]) -> Vec<String> {
    strings
        .iter()
        .enumerate()
        .map(|(index, text)| format!("{}. {text}", index + 1))
        .collect()
}

pub fn filter_greater_than(numbers: &[i64], threshold: i64) -> Vec<i64> {
    numbers.iter().copied().filter(|n| *n > threshold).collect()
}

fn result_severity<T>(items: &[T]) -> Severity {
    if items.is_empty() { Warning } else { Success }
}

fn filter_even_task() -> TaskBuilder {
    let cases: [&[i64]; 5] = [
        &[1, 2, 3, 4, 5, 6],
        &[10, 15, 20, 25],
        &[0, -1, -2, -3, -4],
        &[],
        &[7, 9, 11],
    ];

    let mut task = Task::builder("Filter even numbers")
        .line("Task 1: Filtering even numbers out of an array", System, 0)
        .line("Created the function filter_even_numbers:", Info, 300)
        .code(
            "fn filter_even_numbers(numbers: &[i64]) -> Vec<i64> {\n    numbers.iter().copied().filter(|n| n % 2 == 0).collect()\n}",
            400,
        )
        .line("Testing the function on different arrays:", Info, 400);

    for (index, input) in cases.into_iter().enumerate() {
        let result = filter_even_numbers(input);
        task = task
            .line(format!("Test {}:", index + 1), Info, 200)
            .line(format!("Input: {}", bracketed(input)), Info, 200)
            .line(
                format!("Result: {}", bracketed(&result)),
                result_severity(&result),
                300,
            );
        if input.is_empty() {
            task = task.line("An empty array yields an empty result", Info, 200);
        }
    }

    task.line("Task 1 complete", Success, 400)
}

fn countdown_task() -> TaskBuilder {
    let values = [5.0, 3.0, 10.0, 1.0, 0.0, -5.0, 7.5];

    let mut task = Task::builder("Countdown")
        .separator("~", 500)
        .line("Task 2: Counting down from n to 1 with a while loop", System, 0)
        .line("Created the function countdown_from:", Info, 300)
        .code(
            "fn countdown_from(n: u64) -> Vec<u64> {\n    let mut result = Vec::new();\n    let mut current = n;\n\n    while current >= 1 {\n        result.push(current);\n        current -= 1;\n    }\n\n    result\n}",
            400,
        )
        .line("Testing the function on different values:", Info, 400);

    for value in values {
        task = task.line(format!("Test with n = {value}:"), Info, 200);
        task = match countdown_from(value) {
            Ok(result) => task.line(
                format!("Result: [{}]", joined(&result, " → ")),
                Success,
                300,
            ),
            Err(reason) => task.line(format!("Result: Error: {reason}"), Error, 300),
        };
    }

    task.line("Task 2 complete", Success, 400)
}

fn word_lengths_task() -> TaskBuilder {
    let cases: [&[&str]; 5] = [
        &["apple", "cat", "banana"],
        &["Rust", "HTML", "CSS"],
        &["MIET", "Tver", "программирование"],
        &["", "a", "abcde"],
        &["sunny", "rain", "wind"],
    ];

    let mut task = Task::builder("Word lengths")
        .separator("~", 500)
        .line("Task 3: Measuring word lengths with map", System, 0)
        .line("Created the function word_lengths:", Info, 300)
        .code(
            "fn word_lengths(words: &[&str]) -> Vec<usize> {\n    words.iter().map(|word| word.chars().count()).collect()\n}",
            400,
        )
        .line("Testing the function on different word lists:", Info, 400);

    for (index, words) in cases.into_iter().enumerate() {
        let lengths = word_lengths(words);
        let described = words
            .iter()
            .zip(&lengths)
            .map(|(word, length)| format!("\"{word}\"({length})"))
            .collect::<Vec<_>>()
            .join(", ");
        task = task
            .line(format!("Test {}:", index + 1), Info, 200)
            .line(format!("Words: {described}"), Info, 300)
            .line(format!("Lengths: {}", bracketed(&lengths)), Success, 300);
        if words.contains(&"") {
            task = task.line("An empty string has length 0", Info, 200);
        }
    }

    task.line("Task 3 complete", Success, 400)
}

fn numbered_strings_task() -> TaskBuilder {
    let cases: [&[&str]; 4] = [
        &["Hello", "How are you?", "Goodbye"],
        &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
        &["Red", "Green", "Blue"],
        &["Coffee", "Tea"],
    ];

    let mut task = Task::builder("Numbered strings")
        .separator("~", 500)
        .line("Task 4: Numbering strings", System, 0)
        .line("Created the function numbered_strings:", Info, 300)
        .code(
            "fn numbered_strings(strings: &[&str]) -> Vec<String> {\n    strings\n        .iter()\n        .enumerate()\n        .map(|(index, text)| format!(\"{}. {text}\", index + 1))\n        .collect()\n}",
            400,
        )
        .line("Testing the function on different string lists:", Info, 400);

    for (index, strings) in cases.into_iter().enumerate() {
        let quoted: Vec<String> = strings.iter().map(|s| format!("\"{s}\"")).collect();
        task = task
            .line(
                format!("Test {} with the array: {}", index + 1, bracketed(&quoted)),
                Info,
                300,
            )
            .line("Numbered output:", System, 200);
        for line in numbered_strings(strings) {
            task = task.line(line, Info, 150);
        }
        task = task.line("Strings numbered with enumerate", Info, 300);
    }

    task.line("Task 4 complete", Success, 400)
}

fn filter_greater_task() -> TaskBuilder {
    let cases: [(&[i64], i64); 5] = [
        (&[10, 20, 30, 40, 50], 25),
        (&[5, 15, 25, 35, 45], 20),
        (&[1, 2, 3, 4, 5], 10),
        (&[100, 200, 300], 150),
        (&[-10, -5, 0, 5, 10], -3),
    ];

    let mut task = Task::builder("Filter greater than")
        .separator("~", 500)
        .line("Task 5: Finding numbers greater than a threshold", System, 0)
        .line("Created the function filter_greater_than:", Info, 300)
        .code(
            "fn filter_greater_than(numbers: &[i64], threshold: i64) -> Vec<i64> {\n    numbers.iter().copied().filter(|n| *n > threshold).collect()\n}",
            400,
        )
        .line("Testing the function on different data sets:", Info, 400);

    for (index, (numbers, threshold)) in cases.into_iter().enumerate() {
        let result = filter_greater_than(numbers, threshold);
        task = task
            .line(format!("Test {}:", index + 1), Info, 200)
            .line(
                format!("Array: {}, n = {threshold}", bracketed(numbers)),
                Info,
                200,
            )
            .line(
                format!("Result: {}", bracketed(&result)),
                result_severity(&result),
                300,
            );
        task = if result.is_empty() {
            task.line("No numbers in the array exceed the threshold", Info, 200)
        } else {
            task.line(
                format!("Found {} numbers greater than {threshold}", result.len()),
                Info,
                200,
            )
        };
    }

    task.line("Example from the assignment:", System, 400)
        .line("filter_greater_than(&[10, 20, 30, 40, 50], 25)", Info, 200)
        .compute(Success, 300, || {
            Ok(format!(
                "Result: {}",
                bracketed(&filter_greater_than(&[10, 20, 30, 40, 50], 25))
            ))
        })
        .line("Task 5 complete", Success, 400)
}
