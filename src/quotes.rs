use chrono::{Datelike, NaiveDate};

pub const USER_NAME: &str = "Future Topper";
pub const DREAM_COLLEGE: &str = "AIIMS DELHI";

const QUOTES: [&str; 8] = [
    "It always seems impossible until it is done.",
    "Don't stop when you're tired. Stop when you're done.",
    "Your dream college is waiting for you.",
    "Discipline is doing what needs to be done, even if you don't want to do it.",
    "Pain is temporary. Glory is forever.",
    "The secret of your future is hidden in your daily routine.",
    "Suffer the pain of discipline or suffer the pain of regret.",
    "Success is the sum of small efforts, repeated day in and day out.",
];

/// One quote per day, rotating through the list by day-of-year.
pub fn quote_for(date: NaiveDate) -> &'static str {
    QUOTES[date.ordinal() as usize % QUOTES.len()]
}

pub fn daily_quote() -> &'static str {
    quote_for(chrono::Local::now().date_naive())
}
