//! Fuzzy date extraction from free text.
//!
//! The extractor knows a fixed list of date layouts and tries them in
//! priority order; the first layout whose first occurrence in the text forms
//! a real calendar date wins.
//!
//! ## Layouts
//!
//! Component orders, highest priority first:
//!
//! - day, month, year (`16.07.2018`, `16072018`, `16 July 2018`)
//! - year, month, day (`2018-07-16`, `20180716`)
//! - year, day, month
//! - month, day, year (`July 16, 2018`)
//!
//! For every order the month is written as a two-digit number, an
//! abbreviated month name or a full month name, in each configured locale.
//! Parts are joined by up to three of `.`, `-`, `_`, `/`, `,` or whitespace,
//! or by nothing at all.
//!
//! Because the first valid layout wins, ambiguous text such as `02.03.2015`
//! always reads as day-month-year.

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SEPARATOR: &str = r"[.\-_\s/,]{0,3}";
const DAY: &str = r"(?P<day>0?[1-9]|[12]\d|3[01])";
const NUMERIC_MONTH: &str = r"(?P<month>0[1-9]|1[0-2])";
const YEAR: &str = r"(?P<year>(?:19|20)\d{2})";

/// Locales whose month names the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    De,
    En,
    Fr,
}

impl DateLocale {
    fn full_month_names(self) -> [&'static str; 12] {
        match self {
            DateLocale::De => [
                "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
                "September", "Oktober", "November", "Dezember",
            ],
            DateLocale::En => [
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            DateLocale::Fr => [
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                "septembre", "octobre", "novembre", "décembre",
            ],
        }
    }

    fn abbreviated_month_names(self) -> [&'static str; 12] {
        match self {
            DateLocale::De => [
                "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov",
                "Dez",
            ],
            DateLocale::En => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ],
            DateLocale::Fr => [
                "janv", "févr", "mars", "avr", "mai", "juin", "juil", "août", "sept", "oct",
                "nov", "déc",
            ],
        }
    }
}

/// A date found in text, together with the exact substring it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    pub raw: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentOrder {
    DayMonthYear,
    YearMonthDay,
    YearDayMonth,
    MonthDayYear,
}

impl ComponentOrder {
    const PRIORITY: [ComponentOrder; 4] = [
        ComponentOrder::DayMonthYear,
        ComponentOrder::YearMonthDay,
        ComponentOrder::YearDayMonth,
        ComponentOrder::MonthDayYear,
    ];

    fn arrange<'a>(self, day: &'a str, month: &'a str, year: &'a str) -> [&'a str; 3] {
        match self {
            ComponentOrder::DayMonthYear => [day, month, year],
            ComponentOrder::YearMonthDay => [year, month, day],
            ComponentOrder::YearDayMonth => [year, day, month],
            ComponentOrder::MonthDayYear => [month, day, year],
        }
    }
}

#[derive(Debug)]
struct Candidate {
    pattern: Regex,
    /// Lowercased month name to month number; `None` for numeric months.
    month_names: Option<HashMap<String, u32>>,
}

impl Candidate {
    fn numeric(order: ComponentOrder) -> Self {
        Self {
            pattern: Self::compile(order, NUMERIC_MONTH),
            month_names: None,
        }
    }

    fn named(order: ComponentOrder, names: [&'static str; 12]) -> Self {
        let lookup: HashMap<String, u32> = names
            .iter()
            .zip(1..)
            .map(|(name, number)| (name.to_lowercase(), number))
            .collect();

        // Longest names first so that alternation never stops at a prefix.
        let mut alternatives: Vec<&str> = names.to_vec();
        alternatives.sort_by_key(|name| std::cmp::Reverse(name.chars().count()));
        let alternation = alternatives
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");

        Self {
            pattern: Self::compile(order, &format!("(?P<month>{alternation})")),
            month_names: Some(lookup),
        }
    }

    fn compile(order: ComponentOrder, month: &str) -> Regex {
        let [first, second, third] = order.arrange(DAY, month, YEAR);
        let source =
            format!(r"(?i)(?P<date>{first}{SEPARATOR}{second}{SEPARATOR}{third})(?:\D|$)");
        Regex::new(&source).expect("date candidate patterns are built from fixed parts")
    }

    /// First occurrence of this layout in `text`, if it is a calendar date.
    fn first_match(&self, text: &str) -> Option<ExtractedDate> {
        let captures = self.pattern.captures(text)?;
        let raw = captures.name("date")?.as_str();

        let date = self.to_date(&captures);
        if date.is_none() {
            tracing::trace!(raw, "date candidate matched but is not a calendar date");
        }

        Some(ExtractedDate {
            date: date?,
            raw: raw.to_string(),
        })
    }

    fn to_date(&self, captures: &Captures<'_>) -> Option<NaiveDate> {
        let day: u32 = captures.name("day")?.as_str().parse().ok()?;
        let year: i32 = captures.name("year")?.as_str().parse().ok()?;
        let month_raw = captures.name("month")?.as_str();
        let month = match &self.month_names {
            Some(names) => *names.get(&month_raw.to_lowercase())?,
            None => month_raw.parse().ok()?,
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Finds the first date in free text.
///
/// All layouts are compiled once in [`DateExtractor::new`]; extracting is
/// read-only, so one extractor can be shared between threads.
#[derive(Debug)]
pub struct DateExtractor {
    candidates: Vec<Candidate>,
}

impl DateExtractor {
    /// Builds the layout list for the given locales, in priority order.
    ///
    /// Duplicate locales are ignored.
    pub fn new(locales: &[DateLocale]) -> Self {
        let mut unique: Vec<DateLocale> = Vec::with_capacity(locales.len());
        for locale in locales {
            if !unique.contains(locale) {
                unique.push(*locale);
            }
        }

        let mut candidates = Vec::new();
        for order in ComponentOrder::PRIORITY {
            candidates.push(Candidate::numeric(order));
            for locale in &unique {
                candidates.push(Candidate::named(order, locale.abbreviated_month_names()));
            }
            for locale in &unique {
                candidates.push(Candidate::named(order, locale.full_month_names()));
            }
        }

        Self { candidates }
    }

    /// Returns the first date found in `text`, or `None`.
    ///
    /// Layouts are tried in priority order; for each one only its first
    /// occurrence counts. An occurrence that is no calendar date (month 13,
    /// February 30th) moves on to the next layout.
    pub fn extract(&self, text: &str) -> Option<ExtractedDate> {
        self.candidates
            .iter()
            .find_map(|candidate| candidate.first_match(text))
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new(&[DateLocale::De, DateLocale::En])
    }
}
