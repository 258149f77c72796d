/*
[INPUT]:  None (static lesson content)
[OUTPUT]: "basics" lesson - variables, objects, functions and conditionals
[POS]:    Lesson catalog entry
[UPDATE]: When changing the basics lesson content
*/

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::{Lesson, epilogue, prologue};
use crate::error::StepError;
use crate::log::Severity::{Info, Success, System, Warning};
use crate::task::{Script, Step, StepText, Task};

pub fn lesson() -> Lesson {
    let script = Script::new(vec![variables(), objects(), functions()])
        .with_prologue(prologue(&[
            ("🚀 Starting the practical tasks...", System, 800),
            ("⚡ Initializing the system...", Info, 600),
            ("📊 Checking variables... ✓", Success, 400),
            ("🛠️ Loading objects... ✓", Success, 400),
            ("🔧 Preparing functions... ✓", Success, 400),
            ("🎉 Everything is ready!", Success, 400),
        ]))
        .with_epilogue(epilogue("🎊 All tasks completed successfully!", &[]));

    Lesson {
        id: "basics",
        title: "Variables, objects and functions",
        summary: "Assignments, descriptive names, nested objects, increments and conditionals",
        script,
        bonus: Some(bonus()),
    }
}

fn variables() -> Task {
    let user_name = "Ivan";
    let admin_name = user_name;

    Task::builder("Variables")
        .group_header("📝 GROUP 1: BASIC VARIABLE OPERATIONS", 500)
        .line("🎯 Task 1: Working with variables", System, 0)
        .line("📦 Declared variables: admin_name and user_name", Info, 300)
        .line(format!("🆔 user_name = \"{user_name}\""), Info, 200)
        .line("🔄 admin_name = user_name", Info, 200)
        .line(format!("✅ Result: admin_name = \"{admin_name}\""), Success, 300)
        .separator("~", 400)
        .line("🎯 Task 2: Descriptive variable names", System, 0)
        .line("🌍 planet_name = \"Earth\"", Info, 200)
        .line("👤 current_user_name = \"Boban\"", Info, 200)
        .line("📅 user_registration_date = \"2024-01-15\"", Info, 200)
        .line("👑 user_role = \"administrator\"", Info, 200)
        .line("✅ Variables created with descriptive names", Success, 300)
        .build()
}

fn objects() -> Task {
    Task::builder("Objects")
        .separator("=", 600)
        .group_header("🛠️ GROUP 2: WORKING WITH OBJECTS", 500)
        .line("🎯 Task 3: Working with objects", System, 0)
        .line("📦 Created the product object:", Info, 300)
        .step(pretty(400, || json!({ "name": "Desktop laptop", "price": 45000 })))
        .line("🔄 Added a category and updated the price:", Info, 400)
        .step(pretty(400, || {
            json!({ "name": "Desktop laptop", "price": 42000, "category": "Electronics" })
        }))
        .line("✅ Object updated", Success, 300)
        .separator("~", 500)
        .line("🎯 Task 4: Working with nested objects", System, 0)
        .line("📦 Created the student object:", Info, 300)
        .step(pretty(500, || {
            json!({
                "name": "Anna",
                "age": 20,
                "courses": ["Mathematics", "Physics", "Programming"],
                "address": { "city": "Moscow", "street": "Lenina", "number": 15 }
            })
        }))
        .line("🔄 Manipulating the object:", Info, 400)
        .line("- 📚 Added the \"Rust\" course", Info, 200)
        .line("- 🏙️ City changed to \"Saint Petersburg\"", Info, 200)
        .line("- ❌ Removed the first course", Info, 200)
        .line("- 📊 Added grades", Info, 200)
        .line("📋 Final student object:", Info, 400)
        .step(pretty(600, || {
            json!({
                "name": "Anna",
                "age": 20,
                "courses": ["Physics", "Programming", "Rust"],
                "address": { "city": "Saint Petersburg", "street": "Lenina", "number": 15 },
                "grades": { "Mathematics": 4, "Physics": 5, "Programming": 5, "Rust": 5 }
            })
        }))
        .line("✅ Nested object processed", Success, 300)
        .build()
}

fn functions() -> Task {
    let (mut a, mut b) = (1, 1);
    a += 1;
    let c = a;
    let d = b;
    b += 1;

    Task::builder("Functions")
        .separator("=", 600)
        .group_header("⚙️ GROUP 3: FUNCTIONS AND LOGIC", 500)
        .line("🎯 Task 5: Reading code", System, 0)
        .line("🔍 Source code:", Info, 300)
        .line("let (mut a, mut b) = (1, 1);", Info, 200)
        .line("a += 1; let c = a; (increment, then read)", Info, 200)
        .line("let d = b; b += 1; (read, then increment)", Info, 200)
        .line("📊 Result:", Info, 300)
        .line(format!("a = {a}, b = {b}, c = {c}, d = {d}"), Info, 300)
        .line("✅ Increment first: the read sees the new value", Success, 300)
        .line("✅ Read first: the read sees the old value", Success, 300)
        .separator("~", 500)
        .line("🎯 Task 6: Writing functions", System, 0)
        .line("🔧 Functions created:", Info, 300)
        .line("greet(name) - returns a greeting", Info, 200)
        .line("sum(a, b) - returns the sum of two numbers", Info, 200)
        .line("is_even(number) - checks whether a number is even", Info, 200)
        .line("calculate_area(width, height) - computes an area", Info, 200)
        .line("🧪 Testing the functions:", Info, 300)
        .compute(Info, 200, || Ok(format!("greet(\"Maria\") = \"{}\"", greet("Maria"))))
        .compute(Info, 200, || Ok(format!("sum(5, 3) = {}", sum(5, 3))))
        .compute(Info, 200, || Ok(format!("is_even(4) = {}", is_even(4))))
        .compute(Info, 200, || Ok(format!("is_even(7) = {}", is_even(7))))
        .compute(Info, 200, || {
            Ok(format!("calculate_area(5, 10) = {}", calculate_area(5, 10)))
        })
        .line("✅ All functions work correctly", Success, 300)
        .separator("~", 500)
        .line("🎯 Task 7: Functions and conditionals", System, 0)
        .line("🔞 Testing check_age:", Info, 300)
        .compute(Info, 200, || Ok(format!("check_age(16) = \"{}\"", check_age(16))))
        .compute(Info, 200, || Ok(format!("check_age(25) = \"{}\"", check_age(25))))
        .compute(Info, 200, || Ok(format!("check_age(65) = \"{}\"", check_age(65))))
        .line("💰 Testing get_discount:", Info, 300)
        .compute(Info, 200, || Ok(format!("get_discount(500) = {}%", get_discount(500))))
        .compute(Info, 200, || Ok(format!("get_discount(2500) = {}%", get_discount(2500))))
        .compute(Info, 200, || Ok(format!("get_discount(7500) = {}%", get_discount(7500))))
        .line("👋 Testing greet_user:", Info, 300)
        .compute(Info, 200, || {
            Ok(format!("greet_user(\"Alexei\", 25) = \"{}\"", greet_user("Alexei", 25)))
        })
        .line("✅ Conditionals work correctly", Success, 300)
        .build()
}

fn bonus() -> Task {
    Task::builder("Bonus")
        .separator("*", 300)
        .line("🐾 And here is Christopher! Looks like he did something again...", System, 500)
        .line("⚠️ Christopher was found hiding in the code!", Warning, 300)
        .line("💡 He seems to have stolen all the semicolons... again", Info, 300)
        .build()
}

/// Code block with the object pretty-printed as JSON.
fn pretty<F>(delay_ms: u64, value: F) -> Step
where
    F: Fn() -> serde_json::Value + Send + Sync + 'static,
{
    let text = StepText::Resolved(Arc::new(move || {
        serde_json::to_string_pretty(&value())
            .map_err(|err| StepError::new(format!("cannot render object: {err}")))
    }));
    Step::code(text, Duration::from_millis(delay_ms))
}

pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

pub fn sum(a: i64, b: i64) -> i64 {
    a + b
}

pub fn is_even(number: i64) -> bool {
    number % 2 == 0
}

pub fn calculate_area(width: i64, height: i64) -> i64 {
    width * height
}

pub fn check_age(age: u32) -> &'static str {
    match age {
        0..=17 => "Access denied: under 18.",
        18..=59 => "Access granted: welcome!",
        _ => "Access granted: welcome! Special privileges apply.",
    }
}

/// Discount percentage for an order total.
pub fn get_discount(total_amount: u64) -> u8 {
    match total_amount {
        0..1000 => 0,
        1000..=5000 => 5,
        _ => 10,
    }
}

pub fn greet_user(name: &str, age: u32) -> String {
    format!("{} {}", greet(name), check_age(age))
}
