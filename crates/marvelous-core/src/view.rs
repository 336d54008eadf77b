use std::cmp::Ordering;

use crate::{Task, TextMatcher};

/// Select the tasks to display for a search string, ordered by content.
///
/// An empty search keeps every task. The matching tasks are sorted after filtering,
/// so the result is always ordered. The input is left untouched.
pub fn filter_sort<'a, I>(tasks: I, search: &str) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let matcher = TextMatcher::new(search);
    let mut visible: Vec<&Task> = tasks
        .into_iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .collect();
    visible.sort_by(|a, b| compare_content(&a.content, &b.content));
    visible
}

/// Collation used for task content.
///
/// Letters compare case-insensitively first. Strings that only differ in case put the
/// lowercase form first, the way dictionary collations do.
pub fn compare_content(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TaskId, TaskStatus};
    use time::OffsetDateTime;

    fn task(id: &str, content: &str) -> Task {
        Task::new(
            TaskId::new(id),
            content.into(),
            OffsetDateTime::UNIX_EPOCH,
            TaskStatus::Doing,
        )
    }

    fn contents<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|task| task.content.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Zebra"),
            task("2", "Apple"),
            task("3", "banana"),
            task("4", "zeppelin tickets"),
            task("5", "Call mom"),
            task("6", "apple pie"),
        ]
    }

    #[test]
    fn empty_search_sorts_everything() {
        let list = vec![task("1", "Zebra"), task("2", "Apple")];
        let shown = filter_sort(&list, "");
        assert_eq!(contents(&shown), vec!["Apple", "Zebra"]);
    }

    #[test]
    fn search_filters_case_insensitively() {
        let list = vec![task("1", "Zebra"), task("2", "Apple")];
        let shown = filter_sort(&list, "ze");
        assert_eq!(contents(&shown), vec!["Zebra"]);
    }

    #[test]
    fn search_result_is_sorted() {
        let list = sample();
        let shown = filter_sort(&list, "E");
        assert_eq!(
            contents(&shown),
            vec!["Apple", "apple pie", "Zebra", "zeppelin tickets"]
        );
    }

    #[test]
    fn every_match_is_kept_and_nothing_else() {
        let list = sample();
        for query in ["a", "AP", "z", "mom", " ", "xyz", "pie"] {
            let shown = filter_sort(&list, query);
            let needle = query.to_lowercase();
            for item in &shown {
                assert!(item.content.to_lowercase().contains(&needle), "{query}");
            }
            let expected = list
                .iter()
                .filter(|item| item.content.to_lowercase().contains(&needle))
                .count();
            assert_eq!(shown.len(), expected, "{query}");
        }
    }

    #[test]
    fn input_order_is_untouched() {
        let list = sample();
        let before: Vec<TaskId> = list.iter().map(|item| item.id.clone()).collect();
        let _ = filter_sort(&list, "");
        let after: Vec<TaskId> = list.iter().map(|item| item.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn collation_ignores_case_before_bytes() {
        assert_eq!(compare_content("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_content("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_content("a", "A"), Ordering::Less);
        assert_eq!(compare_content("same", "same"), Ordering::Equal);
    }

    #[test]
    fn empty_list_yields_nothing() {
        let list: Vec<Task> = Vec::new();
        assert!(filter_sort(&list, "").is_empty());
        assert!(filter_sort(&list, "x").is_empty());
    }
}
