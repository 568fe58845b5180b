use crate::events::model::EventRecord;
use itertools::Itertools;
use std::cmp::Ordering;
use voca_rs::manipulate::latinise;

/// Distinct venue names for the venue picker.
///
/// Names are trimmed, blanks dropped, and the result ordered with
/// [`locale_compare`].
pub fn unique_venues<'a, I>(events: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a EventRecord>,
{
    events
        .into_iter()
        .filter_map(|event| event.venue.as_deref())
        .map(str::trim)
        .filter(|venue| !venue.is_empty())
        .unique()
        .sorted_by(|a, b| locale_compare(a, b))
        .map(str::to_string)
        .collect()
}

// Punctuation and common symbols, in dictionary order.
const SYMBOL_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Dictionary-style ordering: letters first compared without accents or
/// case, then unaccented before accented, then lowercase before uppercase.
///
/// On the primary level spaces sort before punctuation, punctuation before
/// other symbols, symbols before digits and digits before letters.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let (base_a, base_b) = (latinise(a).to_lowercase(), latinise(b).to_lowercase());

    base_a
        .chars()
        .map(primary_weight)
        .cmp(base_b.chars().map(primary_weight))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(case_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_weight(c: char) -> (u8, usize, char) {
    if c.is_whitespace() {
        return (0, 0, ' ');
    }

    if let Some(rank) = SYMBOL_ORDER.find(c) {
        return (1, rank, c);
    }

    match c {
        _ if c.is_numeric() => (3, 0, c),
        _ if c.is_alphabetic() => (4, 0, c),
        _ => (2, 0, c),
    }
}

fn case_key(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(venue: &str) -> EventRecord {
        EventRecord {
            venue: Some(venue.to_string()),
            ..Default::default()
        }
    }

    #[test_log::test]
    fn should_trim_dedupe_and_drop_blank_venues() {
        let events = vec![
            at("Blue Note "),
            at(" Blue Note"),
            at("   "),
            at(""),
            EventRecord::default(),
            at("Apollo"),
        ];

        assert_eq!(unique_venues(&events), vec!["Apollo", "Blue Note"]);
    }

    #[test_log::test]
    fn should_sort_ignoring_case_first() {
        let events = vec![at("zebra lounge"), at("Bowery Ballroom"), at("apollo")];

        assert_eq!(
            unique_venues(&events),
            vec!["apollo", "Bowery Ballroom", "zebra lounge"]
        );
    }

    #[test_log::test]
    fn accented_names_should_sort_next_to_plain_ones() {
        let events = vec![at("Zénith"), at("Café Oto"), at("Cafe Oto"), at("Dalston")];

        assert_eq!(
            unique_venues(&events),
            vec!["Cafe Oto", "Café Oto", "Dalston", "Zénith"]
        );
    }

    #[test_log::test]
    fn lowercase_should_come_before_uppercase() {
        assert_eq!(locale_compare("jazz", "Jazz"), Ordering::Less);
        assert_eq!(locale_compare("Jazz", "jazz"), Ordering::Greater);
        assert_eq!(locale_compare("Jazz", "Jazz"), Ordering::Equal);
    }

    #[test_log::test]
    fn punctuation_should_sort_before_digits_and_letters() {
        let events = vec![at("A&B"), at("A-B"), at("A_B"), at("A1"), at("AB"), at("A B")];

        assert_eq!(
            unique_venues(&events),
            vec!["A B", "A_B", "A-B", "A&B", "A1", "AB"]
        );
    }
}
