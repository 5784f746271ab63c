//! End-to-end extraction tests against a pinned reference instant.

use chrono::{DateTime, TimeZone, Utc};
use datescout::{extract, DateGroup, Extractor, ExtractorConfig};
use pretty_assertions::assert_eq;
use test_case::test_case;

// 2024-08-23 was a friday
fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 23, 9, 0, 0).unwrap()
}

fn run(text: &str) -> Vec<DateGroup> {
    Extractor::default().extract_at(text, reference())
}

fn single(text: &str) -> DateGroup {
    let mut results = run(text);
    assert_eq!(results.len(), 1, "expected one result for {text:?}");
    results.remove(0)
}

#[test_case("meet me june 20th", "june 20th", "2024-06-20" ; "month day")]
#[test_case("deadline is 20th of june", "20th of june", "2024-06-20" ; "day of month")]
#[test_case("shipped 6/20/2026", "6/20/2026", "2026-06-20" ; "slash date")]
#[test_case("shipped on 2026-06-20", "on 2026-06-20", "2026-06-20" ; "iso date")]
#[test_case("standup tomorrow morning?", "tomorrow morning", "2024-08-24" ; "relative day")]
#[test_case("see you next friday", "next friday", "2024-08-30" ; "next weekday")]
#[test_case("it happened last monday", "last monday", "2024-08-19" ; "last weekday")]
#[test_case("remind me in 3 days", "in 3 days", "2024-08-26" ; "offset forward")]
#[test_case("that was 2 weeks ago", "2 weeks ago", "2024-08-09" ; "offset backward")]
fn date_phrases(text: &str, matched: &str, date: &str) {
    let group = single(text);
    assert_eq!(group.matched_text, matched);
    assert_eq!(group.resolved_values[0].date_naive().to_string(), date);
}

#[test_case("call at 5pm", "at 5pm", "17:00:00" ; "meridiem")]
#[test_case("train leaves at 17:45", "at 17:45", "17:45:00" ; "clock time")]
#[test_case("lunch around noon", "around noon", "12:00:00" ; "time word")]
#[test_case("done by 8 o'clock", "by 8 o'clock", "08:00:00" ; "o clock")]
fn time_phrases(text: &str, matched: &str, time: &str) {
    let group = single(text);
    assert_eq!(group.matched_text, matched);
    assert_eq!(group.resolved_values[0].time().to_string(), time);
}

#[test]
fn combined_date_and_time() {
    let group = single("party june 20th at 7pm!");
    assert_eq!(group.matched_text, "june 20th at 7pm");
    assert_eq!(group.resolved_values[0].to_rfc3339(), "2024-06-20T19:00:00+00:00");
}

// spans always index the original text, casing intact

#[test]
fn spans_point_into_the_original_text() {
    let source = "Budget review NEXT Friday at 3PM, bring numbers";
    let group = single(source);
    assert_eq!(group.matched_text, "NEXT Friday at 3PM");
    assert_eq!(&source[group.start_offset..group.end_offset], group.matched_text);
    assert_eq!(group.source_text, source);
}

#[test]
fn line_numbers_survive_multiline_input() {
    let results = run("first line has nothing\nsecond line: june 20th");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line, 2);
}

// rule locations

#[test]
fn rule_locations_name_the_matched_parts() {
    let group = single("june 20th at 5pm");
    assert_eq!(group.rule_locations["month_of_year"][0].text, "june");
    assert_eq!(group.rule_locations["day_of_month"][0].text, "20");
    assert_eq!(group.rule_locations["hour_of_day"][0].text, "5");
    assert_eq!(group.rule_locations["meridiem_indicator"][0].text, "pm");
    let phrase = &group.rule_locations["date_time_phrase"][0];
    assert_eq!(phrase.start, group.start_offset);
    assert_eq!(phrase.end, group.end_offset);
}

// recovery: trailing noise is trimmed, leading noise is slid past

#[test]
fn trailing_connector_is_trimmed() {
    let group = single("june 20th on");
    assert_eq!(group.matched_text, "june 20th");
}

#[test]
fn unmatched_candidates_degrade_to_no_results() {
    assert!(run("on the of at").is_empty());
    assert!(run("").is_empty());
    assert!(run("   \n\t ").is_empty());
}

// multiple phrases, source order

#[test]
fn multiple_phrases_in_source_order() {
    let results = run("call at 5, or maybe 6");
    assert_eq!(results.len(), 2);
    assert!(results[0].start_offset < results[1].start_offset);
    assert_eq!(results[0].matched_text, "at 5");
    assert_eq!(results[1].matched_text, "maybe 6");
    // bare hours said at 09:00 mean the coming afternoon
    assert_eq!(results[0].resolved_values[0].to_rfc3339(), "2024-08-23T17:00:00+00:00");
    assert_eq!(results[1].resolved_values[0].to_rfc3339(), "2024-08-23T18:00:00+00:00");
}

// rejection rules

#[test]
fn quantities_are_not_times() {
    assert!(run("i need 1 hard drive and 2 batteries").is_empty());
}

#[test]
fn word_fragments_are_not_phrases() {
    assert!(run("order item x5pm today2").is_empty());
}

#[test]
fn impossible_dates_narrow_instead_of_erroring() {
    // february 30th parses but resolves to nothing, so recovery keeps
    // narrowing until something real survives: the bare month
    let group = single("due february 30th at 5pm");
    assert_eq!(group.matched_text, "february");
    assert_eq!(group.resolved_values[0].date_naive().to_string(), "2024-02-01");
}

// determinism and non-mutation

#[test]
fn extraction_is_deterministic() {
    let text = "sync next tuesday at 10am, then again in 2 weeks";
    let first = run(text);
    let second = run(text);
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.matched_text, b.matched_text);
        assert_eq!(a.resolved_values, b.resolved_values);
    }
}

#[test]
fn extractor_is_reusable_across_inputs() {
    let extractor = Extractor::default();
    assert_eq!(extractor.extract_at("june 20th", reference()).len(), 1);
    assert_eq!(extractor.extract_at("no dates here", reference()).len(), 0);
    assert_eq!(extractor.extract_at("june 20th", reference()).len(), 1);
}

// the date-then-time merge heuristic: first expression supplies the date,
// second the time; documented behavior even when word order disagrees

#[test]
fn date_then_time_merge() {
    let group = single("june 20th at 5pm sharp");
    assert_eq!(group.matched_text, "june 20th at 5pm");
    assert_eq!(group.resolved_values[0].to_rfc3339(), "2024-06-20T17:00:00+00:00");
}

#[test]
fn configured_timezone_shapes_results() {
    let config = ExtractorConfig::from_toml_str(r#"timezone = "Asia/Tokyo""#).unwrap();
    let extractor = Extractor::new(config).unwrap();
    let results = extractor.extract_at("june 20th at 5pm", reference());
    assert_eq!(results[0].resolved_values[0].to_rfc3339(), "2024-06-20T17:00:00+09:00");
}

#[test]
fn default_entry_point_finds_phrases() {
    // resolved against the real clock, so only the span is asserted
    let results = extract("ship it june 20th");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matched_text, "june 20th");
}
