//! Order Text Extraction
//!
//! Parses free-form storefront text (price labels, purchase confirmations)
//! into numbers and structured order details. Extraction never fails: text
//! that does not match yields zero or empty defaults so assertions stay in
//! the test, not in the plumbing.

use lazy_static::lazy_static;
use regex_lite::Regex;

lazy_static! {
    static ref AMOUNT_RE: Regex = Regex::new(r"Amount: (\d+)").unwrap();
    static ref CARD_NUMBER_RE: Regex = Regex::new(r"Card Number: (\d+)").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"Name: ([^\n]+?)\s*Date:").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"Date: ([^\n]+)").unwrap();
}

/// Extract a number from arbitrary UI text.
///
/// Strips every non-digit character, concatenates the remaining digits and
/// parses them as base 10. `None`, empty text, text with no digits, and
/// digit runs too large for `u64` all yield `0`.
///
/// Digits are concatenated with no notion of a decimal or grouping
/// separator, so `"$12.50"` yields `1250` exactly as `"$1,250"` does.
///
/// # Examples
///
/// ```
/// use cartwright::extract::extract_number;
///
/// assert_eq!(extract_number(Some("$1,234 USD")), 1234);
/// assert_eq!(extract_number(Some("Price: 360")), 360);
/// assert_eq!(extract_number(Some("$12.50")), 1250);
/// assert_eq!(extract_number(None), 0);
/// ```
pub fn extract_number(text: Option<&str>) -> u64 {
    let digits: String = text
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Order details scraped from a purchase confirmation blob.
///
/// Each field is extracted independently; a missing label leaves that field
/// at its default (`0` for the amount, empty strings otherwise).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderDetails {
    /// Digits following the `Amount:` label
    pub amount: u64,
    /// Digits following the `Card Number:` label
    pub card_number: String,
    /// Text following the `Name:` label, up to the `Date:` label, trimmed
    pub name: String,
    /// Text following the `Date:` label, to the end of the line
    pub date: String,
}

impl OrderDetails {
    /// Parse a confirmation blob into its order fields.
    ///
    /// The first occurrence of each label wins. The blob may separate
    /// labels with newlines or run them together on a single line; both
    /// forms parse identically.
    pub fn parse(text: &str) -> Self {
        let amount = AMOUNT_RE
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);

        let card_number = first_capture(&CARD_NUMBER_RE, text);
        let name = NAME_RE
            .captures(text)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let date = first_capture(&DATE_RE, text);

        Self {
            amount,
            card_number,
            name,
            date,
        }
    }
}

fn first_capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
