#![allow(missing_docs)]

use core::fmt::Write;

use lazygroup::{LazyGroupByExt, lazy_group_by, try_lazy_group_by};

fn render_word_groups(text: &str) -> String {
    let grouped = text.split_whitespace().lazy_group_by(|w| w.len());
    let mut out = String::new();
    for (len, group) in &grouped {
        writeln!(out, "{len}: {:?}", group.collect::<Vec<_>>()).unwrap();
    }
    out
}

#[test]
fn snapshot_words_by_length() {
    insta::assert_snapshot!(
        render_word_groups("the quick brown fox jumps over the lazy dog"),
        @r#"
    3: ["the", "fox", "the", "dog"]
    5: ["quick", "brown", "jumps"]
    4: ["over", "lazy"]
    "#
    );
}

#[test]
fn snapshot_debug_after_partial_discovery() {
    let grouped = lazy_group_by([1, 2, 1, 3], |n: &i32| *n);
    let twos = grouped.get_group(&2).unwrap();

    insta::assert_snapshot!(format!("{grouped:?}"), @"Grouped { keys: [1, 2], exhausted: false, .. }");
    insta::assert_snapshot!(format!("{twos:?}"), @"Group { key: 2, buffered: 1, .. }");
}

#[test]
fn snapshot_selector_error() {
    let grouped = try_lazy_group_by(["7", "8", "nine"], |s: &&str| s.parse::<u32>());
    let error = grouped.try_get_group(&9).unwrap_err();

    insta::assert_snapshot!(error.to_string(), @"key selector failed at item 2: invalid digit found in string");
}
